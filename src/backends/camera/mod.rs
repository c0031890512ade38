// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The capture screen only ever talks to a [`CameraProvider`]. The shipped
//! implementation drives V4L2 devices directly; tests substitute their own.
//!
//! ```text
//! ┌─────────────────────┐
//! │   Capture screen    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraProvider trait│  ← permission, preview, still capture
//! └──────────┬──────────┘
//!            │
//!            ▼
//!      ┌──────────┐
//!      │V4l2Camera│  ← /dev/video*, sysfs flash LED, camera portal
//!      └──────────┘
//! ```

pub mod format_converters;
pub mod types;
pub mod v4l2;
pub mod v4l2_utils;

pub use types::*;
pub use v4l2::V4l2Camera;

use crate::errors::CaptureError;
use crate::flash::FlashMode;
use crate::storage::ImageUri;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Live preview, still capture and camera permission.
///
/// Methods return owned futures so calls can be handed to the UI runtime
/// without borrowing the provider.
pub trait CameraProvider: Send + Sync {
    /// Ask the OS for camera access
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus>;

    /// Take a still with the given lens and flash setting.
    ///
    /// The image is written to the capture cache and referenced by URI.
    fn capture(
        &self,
        lens: LensFacing,
        flash: FlashMode,
    ) -> BoxFuture<'static, Result<ImageUri, CaptureError>>;

    /// Stream preview frames from `lens` until the stream is dropped
    fn preview(&self, lens: LensFacing) -> BoxStream<'static, Arc<CameraFrame>>;

    /// Devices this provider can use, with their lens assignment
    fn list_cameras(&self) -> Vec<CameraDevice>;
}
