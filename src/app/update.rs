// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function routes each message to a handler method in
//! the `handlers` submodules.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: context drawer, URLs, config reloads, notices
//! - `handlers::camera`: permission flow and preview frames
//! - `handlers::capture`: capture, retake and save

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::DismissNotice(serial) => self.handle_dismiss_notice(serial),

            // ===== Capture screen =====
            Message::Action(action) => self.handle_action(action),
            Message::Completed(outcome) => self.handle_completed(outcome),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::CapturedImageLoaded(image, handle) => {
                self.handle_captured_image_loaded(image, handle)
            }
        }
    }
}
