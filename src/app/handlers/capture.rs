// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen handlers
//!
//! Feeds user actions into the screen state machine and runs the provider
//! calls it asks for.

use crate::app::effects;
use crate::app::screen::{Action, Effect, Outcome};
use crate::app::state::{AppModel, Message};
use crate::storage::ImageUri;
use cosmic::Task;
use tracing::{debug, info};

impl AppModel {
    // =========================================================================
    // Capture Screen Handlers
    // =========================================================================

    pub(crate) fn handle_action(&mut self, action: Action) -> Task<cosmic::Action<Message>> {
        let effect = self.screen.dispatch(action);
        self.sync_view_state();
        match effect {
            Some(effect) => self.run_effect(effect),
            None => Task::none(),
        }
    }

    /// Run a provider call off the UI thread
    pub(crate) fn run_effect(&self, effect: Effect) -> Task<cosmic::Action<Message>> {
        debug!(?effect, "Running effect");
        let providers = self.providers.clone();
        Task::perform(effects::run(effect, providers), |outcome| {
            cosmic::Action::App(Message::Completed(outcome))
        })
    }

    pub(crate) fn handle_completed(&mut self, outcome: Outcome) -> Task<cosmic::Action<Message>> {
        let serial = self.screen.notice_serial();
        self.screen.complete(outcome);
        self.sync_view_state();

        let mut tasks = Vec::new();

        if self.captured_handle.is_none() {
            if let Some(image) = self.screen.captured_image().cloned() {
                let mirrored = self.screen.lens_facing().is_mirrored();
                let source = image.clone();
                tasks.push(Task::perform(
                    crate::storage::load_display_image(image, mirrored),
                    move |handle| cosmic::Action::App(Message::CapturedImageLoaded(source, handle)),
                ));
            }
        }

        if self.screen.notice_serial() != serial {
            tasks.push(self.notice_timer());
        }

        Task::batch(tasks)
    }

    pub(crate) fn handle_captured_image_loaded(
        &mut self,
        image: ImageUri,
        handle: Option<cosmic::widget::image::Handle>,
    ) -> Task<cosmic::Action<Message>> {
        // A retake and a new capture can overtake a slow decode
        if !self.screen.is_reviewing(&image) {
            debug!(%image, "Captured image no longer shown, discarding decode");
            return Task::none();
        }
        if handle.is_none() {
            info!("Captured image could not be decoded for preview");
        }
        self.captured_handle = handle;
        Task::none()
    }
}
