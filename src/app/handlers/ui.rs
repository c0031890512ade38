// SPDX-License-Identifier: GPL-3.0-only

//! UI Navigation handlers
//!
//! Handles context pages, external links, config reloads and notices.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::Config;
use cosmic::Task;
use tracing::{debug, error, info};

impl AppModel {
    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }

        let camera_changed = self.config.camera_differs(&config);
        let library_changed = self.config.library_differs(&config);

        info!("Configuration updated");
        self.config = config;

        if camera_changed {
            // The preview subscription id carries the device paths, so the
            // old stream stops and a new one starts on this provider
            self.providers.camera = Self::build_camera(&self.config);
            self.current_frame = None;
            self.preview_handle = None;
        }
        if library_changed {
            self.providers.library = Self::build_library(&self.config);
        }

        cosmic::command::set_theme(self.config.app_theme.theme())
    }

    /// Schedule removal of the current notice
    pub(crate) fn notice_timer(&self) -> Task<cosmic::Action<Message>> {
        if self.screen.notice().is_none() {
            return Task::none();
        }
        let serial = self.screen.notice_serial();
        let timeout = self.config.notice_timeout();
        Task::perform(
            async move {
                tokio::time::sleep(timeout).await;
                serial
            },
            |serial| cosmic::Action::App(Message::DismissNotice(serial)),
        )
    }

    pub(crate) fn handle_dismiss_notice(&mut self, serial: u64) -> Task<cosmic::Action<Message>> {
        if !self.screen.dismiss_notice(serial) {
            debug!(serial, "Notice already replaced");
        }
        Task::none()
    }
}
