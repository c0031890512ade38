// SPDX-License-Identifier: GPL-3.0-only

//! Runs capture screen effects against the providers

use crate::app::screen::{Effect, Outcome};
use crate::backends::camera::CameraProvider;
use crate::backends::media_library::MediaLibraryProvider;
use std::sync::Arc;
use tracing::{debug, warn};

/// Capability providers handed to the screen
#[derive(Clone)]
pub struct Providers {
    pub camera: Arc<dyn CameraProvider>,
    pub library: Arc<dyn MediaLibraryProvider>,
}

impl Providers {
    pub fn new(camera: Arc<dyn CameraProvider>, library: Arc<dyn MediaLibraryProvider>) -> Self {
        Self { camera, library }
    }
}

/// Execute `effect` and report its outcome.
///
/// The library permission is requested alongside the camera permission but
/// only the camera result gates the screen.
pub async fn run(effect: Effect, providers: Providers) -> Outcome {
    match effect {
        Effect::RequestPermissions => {
            let library_request = providers.library.request_permission();
            tokio::spawn(async move {
                let status = library_request.await;
                if status.is_granted() {
                    debug!("Photo library permission granted");
                } else {
                    warn!("Photo library permission denied, saving may fail");
                }
            });

            Outcome::Permission(providers.camera.request_permission().await)
        }
        Effect::Capture { lens, flash } => {
            Outcome::Captured(providers.camera.capture(lens, flash).await)
        }
        Effect::Persist { image } => Outcome::Persisted(providers.library.persist(&image).await),
    }
}
