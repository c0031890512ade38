// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use crate::backends::camera::LensFacing;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Still capture errors
    Capture(CaptureError),
    /// Photo library errors
    Persist(PersistError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera device errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// No device is assigned to the requested lens
    LensUnavailable(LensFacing),
    /// The device exists but may not be opened
    PermissionDenied(String),
    /// Camera is busy or in use
    Busy,
    /// Device does not offer a format we can decode
    InvalidFormat(String),
    /// Backend error (V4L2 ioctl, portal, ...)
    BackendError(String),
}

/// Still capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The camera could not deliver a frame
    Camera(CameraError),
    /// No frame arrived before the warm-up deadline
    NoFrameAvailable,
    /// Converting or encoding the frame failed
    EncodingFailed(String),
    /// Writing the capture file failed
    SaveFailed(String),
}

/// Photo library errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The library directory is not writable
    PermissionDenied(String),
    /// The URI does not point at a readable local file
    InvalidSource(String),
    /// Copying into the library failed
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Persist(e) => write!(f, "Library error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::LensUnavailable(lens) => write!(f, "No {} camera available", lens),
            CameraError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            CameraError::Busy => write!(f, "Camera is busy"),
            CameraError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Camera(e) => write!(f, "{}", e),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::PermissionDenied(msg) => write!(f, "Library not writable: {}", msg),
            PersistError::InvalidSource(msg) => write!(f, "Invalid source image: {}", msg),
            PersistError::Io(msg) => write!(f, "Failed to store image: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for PersistError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        AppError::Persist(err)
    }
}

impl From<CameraError> for CaptureError {
    fn from(err: CameraError) -> Self {
        CaptureError::Camera(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => PersistError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotFound => PersistError::InvalidSource(err.to_string()),
            _ => PersistError::Io(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::ResourceBusy => CameraError::Busy,
            _ => CameraError::BackendError(err.to_string()),
        }
    }
}
