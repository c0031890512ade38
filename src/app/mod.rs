// SPDX-License-Identifier: MPL-2.0

//! Main application module for Snapcam
//!
//! # Architecture
//!
//! - `screen`: capture screen state machine (no UI or provider code)
//! - `effects`: runs the provider calls the state machine asks for
//! - `state`: AppModel and Message
//! - `controls`: icon button widget
//! - `view`: main view rendering
//! - `update`: message routing to `handlers`

mod controls;
pub mod effects;
mod handlers;
pub mod screen;
mod state;
mod update;
mod view;

use crate::backends::camera::format_converters::mirror_rgba;
use crate::config::Config;
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use controls::{IconButton, IconId, icon_button};
pub use screen::{Action, CaptureScreen, Effect, Notice, Outcome, ScreenState};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{info, warn};

const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = crate::config::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name("camera-photo"))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let config = Config::load();

        // Captures left over from a previous run were never saved
        let cache_dir = crate::storage::capture_cache_directory();
        match crate::storage::clear_capture_cache(&cache_dir) {
            Ok(0) => {}
            Ok(removed) => info!(removed, dir = %cache_dir.display(), "Cleared stale captures"),
            Err(e) => warn!(error = %e, dir = %cache_dir.display(), "Failed to clear captures"),
        }

        let providers = Self::build_providers(&config);

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            providers,
            screen: CaptureScreen::new(),
            current_frame: None,
            preview_handle: None,
            captured_handle: None,
        };

        let mount_task = match app.screen.mount() {
            Some(effect) => app.run_effect(effect),
            None => Task::none(),
        };

        (app, mount_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        if !self.screen.shows_live_preview() {
            return config_sub;
        }

        Subscription::batch([config_sub, self.preview_subscription()])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    /// Live preview of the current lens.
    ///
    /// The subscription id changes with the lens and the device mapping, which
    /// stops the old stream and with it the provider's preview thread.
    fn preview_subscription(&self) -> Subscription<Message> {
        use cosmic::iced::futures::StreamExt;

        let lens = self.screen.lens_facing();
        let mirrored = self.preview_mirrored();
        let camera = Arc::clone(&self.providers.camera);
        let id = (
            "preview",
            lens,
            mirrored,
            self.config.back_camera_path.clone(),
            self.config.front_camera_path.clone(),
        );

        Subscription::run_with_id(
            id,
            cosmic::iced::stream::channel(1, move |mut output| async move {
                info!(%lens, mirrored, "Preview subscription started");
                let mut frames = camera.preview(lens);

                while let Some(frame) = frames.next().await {
                    let frame = if mirrored {
                        Arc::new(mirrored_frame(&frame))
                    } else {
                        frame
                    };
                    if let Err(e) = output.try_send(Message::CameraFrame(frame)) {
                        if e.is_disconnected() {
                            break;
                        }
                        // UI is behind; newer frames follow
                    }
                }

                info!(%lens, "Preview subscription ended");
            }),
        )
    }
}

/// Horizontally flipped copy of `frame`
fn mirrored_frame(
    frame: &crate::backends::camera::CameraFrame,
) -> crate::backends::camera::CameraFrame {
    let mut data = frame.data.to_vec();
    mirror_rgba(&mut data, frame.width);
    crate::backends::camera::CameraFrame {
        data: Arc::from(data),
        ..frame.clone()
    }
}
