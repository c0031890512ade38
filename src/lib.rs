// SPDX-License-Identifier: MPL-2.0

//! Snapcam - a point-and-shoot camera for the COSMIC desktop
//!
//! One screen: live preview with lens and flash toggles, a capture button,
//! and a review step to retake or save the picture.
//!
//! # Architecture
//!
//! - [`app`]: capture screen state machine and UI
//! - [`backends`]: camera and photo library providers
//! - [`config`]: user configuration handling
//! - [`storage`]: capture cache, image URIs and library file naming
//! - [`flash`]: sysfs flash LED control
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // snapcam
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod storage;

// Re-export commonly used types
pub use app::{Action, AppModel, CaptureScreen, Message, ScreenState};
pub use config::Config;
pub use storage::ImageUri;
