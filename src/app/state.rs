// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::effects::Providers;
use crate::app::screen::{Action, CaptureScreen, Outcome};
use crate::backends::camera::CameraFrame;
use crate::config::Config;
use crate::storage::ImageUri;
use cosmic::widget::about::About;
use std::sync::Arc;

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Camera and photo library
    pub providers: Providers,
    /// Capture screen state machine
    pub screen: CaptureScreen,
    /// Newest live preview frame
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Image handle of `current_frame`
    pub preview_handle: Option<cosmic::widget::image::Handle>,
    /// Decoded captured image, present while the image preview is shown
    pub captured_handle: Option<cosmic::widget::image::Handle>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page
    ToggleContextPage(ContextPage),
    /// Configuration changed on disk
    UpdateConfig(Config),

    // ===== Capture screen =====
    /// A control was activated
    Action(Action),
    /// A provider call finished
    Completed(Outcome),
    /// New live preview frame
    CameraFrame(Arc<CameraFrame>),
    /// Captured image decoded for display, tagged with its source
    CapturedImageLoaded(ImageUri, Option<cosmic::widget::image::Handle>),
    /// Notice timer expired; carries the notice serial
    DismissNotice(u64),
}
