// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen state machine
//!
//! The screen is an explicit state machine. Which actions are available is a
//! function of the current state only, and the two provider calls that can
//! be double-triggered (capture, save) have their own in-flight states, so a
//! second activation while one is running is ignored instead of issuing a
//! second call.
//!
//! ```text
//! Unauthorized ──granted──▶ LivePreview ──capture──▶ Capturing
//!      ▲  │                    ▲   ▲                     │
//!      └──┘ denied / retry     │   └──────failed─────────┤
//!                              │                         ▼
//!                        saved │ retake            ImagePreview ◀─┐
//!                              │   ▲                 │ save       │ failed
//!                              │   └─────────────────┤            │
//!                              └──────────────── Saving ──────────┘
//! ```
//!
//! Provider calls are not made here: [`CaptureScreen::dispatch`] returns an
//! [`Effect`] for the caller to run, and the result comes back through
//! [`CaptureScreen::complete`].

use crate::backends::camera::{LensFacing, PermissionStatus};
use crate::errors::{CaptureError, PersistError};
use crate::flash::FlashMode;
use crate::storage::ImageUri;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Where the screen is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    /// Camera permission not granted (yet)
    Unauthorized {
        /// A permission request is in flight
        requesting: bool,
    },
    /// Live preview with capture controls
    LivePreview,
    /// Still capture in flight; preview stays visible
    Capturing,
    /// Showing the captured image
    ImagePreview { image: ImageUri },
    /// Save in flight; the image stays visible
    Saving { image: ImageUri },
}

impl ScreenState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ScreenState::Unauthorized { .. } => "unauthorized",
            ScreenState::LivePreview => "live-preview",
            ScreenState::Capturing => "capturing",
            ScreenState::ImagePreview { .. } => "image-preview",
            ScreenState::Saving { .. } => "saving",
        }
    }
}

/// User intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the permission flow (on mount and on "grant permission")
    RequestPermission,
    ToggleLensFacing,
    ToggleFlash,
    Capture,
    Retake,
    Save,
}

/// Provider work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Prime the library permission and await the camera permission
    RequestPermissions,
    /// Take a still
    Capture { lens: LensFacing, flash: FlashMode },
    /// Add the image to the photo library
    Persist { image: ImageUri },
}

/// Result of an [`Effect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Permission(PermissionStatus),
    Captured(Result<ImageUri, CaptureError>),
    Persisted(Result<PathBuf, PersistError>),
}

/// Transient message shown over the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Save succeeded; holds the asset location
    Saved(PathBuf),
    CaptureFailed,
    SaveFailed,
}

/// State of one capture screen instance
#[derive(Debug, Clone)]
pub struct CaptureScreen {
    state: ScreenState,
    lens_facing: LensFacing,
    flash_mode: FlashMode,
    notice: Option<Notice>,
    /// Bumped on every new notice so a stale auto-dismiss leaves a newer one alone
    notice_serial: u64,
}

impl Default for CaptureScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureScreen {
    pub fn new() -> Self {
        Self {
            state: ScreenState::Unauthorized { requesting: false },
            lens_facing: LensFacing::default(),
            flash_mode: FlashMode::default(),
            notice: None,
            notice_serial: 0,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn lens_facing(&self) -> LensFacing {
        self.lens_facing
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn notice_serial(&self) -> u64 {
        self.notice_serial
    }

    pub fn permission_granted(&self) -> bool {
        !matches!(self.state, ScreenState::Unauthorized { .. })
    }

    /// Image held between a successful capture and a retake or save
    pub fn captured_image(&self) -> Option<&ImageUri> {
        match &self.state {
            ScreenState::ImagePreview { image } | ScreenState::Saving { image } => Some(image),
            _ => None,
        }
    }

    /// Whether `image` is the capture currently under review
    pub fn is_reviewing(&self, image: &ImageUri) -> bool {
        self.captured_image() == Some(image)
    }

    pub fn shows_live_preview(&self) -> bool {
        matches!(self.state, ScreenState::LivePreview | ScreenState::Capturing)
    }

    pub fn shows_image_preview(&self) -> bool {
        self.captured_image().is_some()
    }

    /// Actions the current state accepts
    pub fn available_actions(&self) -> &'static [Action] {
        match self.state {
            ScreenState::Unauthorized { requesting: false } => &[Action::RequestPermission],
            ScreenState::LivePreview => {
                &[Action::ToggleLensFacing, Action::ToggleFlash, Action::Capture]
            }
            ScreenState::ImagePreview { .. } => &[Action::Retake, Action::Save],
            ScreenState::Unauthorized { requesting: true }
            | ScreenState::Capturing
            | ScreenState::Saving { .. } => &[],
        }
    }

    pub fn is_available(&self, action: Action) -> bool {
        self.available_actions().contains(&action)
    }

    /// Start the permission flow when the screen appears
    pub fn mount(&mut self) -> Option<Effect> {
        self.dispatch(Action::RequestPermission)
    }

    /// Apply a user action.
    ///
    /// Actions the current state does not offer are ignored.
    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        if !self.is_available(action) {
            debug!(?action, state = self.state.name(), "Ignoring unavailable action");
            return None;
        }

        match action {
            Action::RequestPermission => {
                self.state = ScreenState::Unauthorized { requesting: true };
                info!("Requesting camera permission");
                Some(Effect::RequestPermissions)
            }
            Action::ToggleLensFacing => {
                self.lens_facing = self.lens_facing.toggled();
                info!(lens = %self.lens_facing, "Lens switched");
                None
            }
            Action::ToggleFlash => {
                self.flash_mode = self.flash_mode.toggled();
                info!(flash = ?self.flash_mode, "Flash toggled");
                None
            }
            Action::Capture => {
                self.state = ScreenState::Capturing;
                Some(Effect::Capture {
                    lens: self.lens_facing,
                    flash: self.flash_mode,
                })
            }
            Action::Retake => {
                self.state = ScreenState::LivePreview;
                debug!("Captured image discarded");
                None
            }
            Action::Save => {
                let ScreenState::ImagePreview { image } = &self.state else {
                    return None;
                };
                let image = image.clone();
                self.state = ScreenState::Saving {
                    image: image.clone(),
                };
                Some(Effect::Persist { image })
            }
        }
    }

    /// Apply the result of an effect.
    ///
    /// Results that do not match the in-flight state are dropped.
    pub fn complete(&mut self, outcome: Outcome) {
        match (&self.state, outcome) {
            (ScreenState::Unauthorized { requesting: true }, Outcome::Permission(status)) => {
                if status.is_granted() {
                    info!("Camera permission granted");
                    self.state = ScreenState::LivePreview;
                } else {
                    warn!("Camera permission denied");
                    self.state = ScreenState::Unauthorized { requesting: false };
                }
            }
            (ScreenState::Capturing, Outcome::Captured(result)) => match result {
                Ok(image) => {
                    info!(%image, "Picture taken");
                    self.state = ScreenState::ImagePreview { image };
                }
                Err(e) => {
                    error!(error = %e, "Capture failed");
                    self.state = ScreenState::LivePreview;
                    self.show_notice(Notice::CaptureFailed);
                }
            },
            (ScreenState::Saving { image }, Outcome::Persisted(result)) => match result {
                Ok(path) => {
                    info!(path = %path.display(), "Picture saved");
                    self.state = ScreenState::LivePreview;
                    self.show_notice(Notice::Saved(path));
                }
                Err(e) => {
                    error!(error = %e, %image, "Saving picture failed");
                    self.state = ScreenState::ImagePreview {
                        image: image.clone(),
                    };
                    self.show_notice(Notice::SaveFailed);
                }
            },
            (state, outcome) => {
                warn!(state = state.name(), ?outcome, "Dropping outcome for another state");
            }
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice_serial += 1;
        self.notice = Some(notice);
    }

    /// Hide the notice if it is still the one identified by `serial`
    pub fn dismiss_notice(&mut self, serial: u64) -> bool {
        if serial == self.notice_serial && self.notice.is_some() {
            self.notice = None;
            true
        } else {
            false
        }
    }
}
