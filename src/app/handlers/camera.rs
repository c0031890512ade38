// SPDX-License-Identifier: GPL-3.0-only

//! Camera handlers
//!
//! Provider construction and live preview frames.

use crate::app::effects::Providers;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::{CameraFrame, CameraProvider, V4l2Camera};
use crate::backends::media_library::{MediaLibraryProvider, PicturesLibrary};
use crate::config::Config;
use cosmic::Task;
use std::sync::Arc;
use tracing::debug;

impl AppModel {
    /// Providers backed by V4L2 and the Pictures directory
    pub(crate) fn build_providers(config: &Config) -> Providers {
        Providers::new(Self::build_camera(config), Self::build_library(config))
    }

    pub(crate) fn build_camera(config: &Config) -> Arc<dyn CameraProvider> {
        Arc::new(V4l2Camera::from_config(config))
    }

    pub(crate) fn build_library(config: &Config) -> Arc<dyn MediaLibraryProvider> {
        Arc::new(PicturesLibrary::from_config(config))
    }

    /// Whether the live preview of the current lens is shown mirrored
    pub(crate) fn preview_mirrored(&self) -> bool {
        self.config.mirror_front_preview && self.screen.lens_facing().is_mirrored()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.screen.shows_live_preview() {
            return Task::none();
        }
        // A frame from the previous lens can still be in flight after a switch
        if frame.lens != self.screen.lens_facing() {
            debug!(lens = %frame.lens, "Dropping frame from inactive lens");
            return Task::none();
        }
        self.preview_handle = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        self.current_frame = Some(frame);
        Task::none()
    }

    /// Drop view data the screen state no longer backs
    pub(crate) fn sync_view_state(&mut self) {
        if self.screen.captured_image().is_none() {
            self.captured_handle = None;
        }
        let stale_frame = self
            .current_frame
            .as_ref()
            .is_some_and(|frame| frame.lens != self.screen.lens_facing());
        if stale_frame || !self.screen.permission_granted() {
            self.current_frame = None;
            self.preview_handle = None;
        }
    }
}
