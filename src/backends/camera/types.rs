// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which physical camera feeds the preview and captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LensFacing {
    /// Rear (world-facing) camera
    #[default]
    Back,
    /// Front (user-facing) camera
    Front,
}

impl LensFacing {
    /// The other lens
    pub fn toggled(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }

    /// Front-lens images are shown mirrored, like a mirror would
    pub fn is_mirrored(self) -> bool {
        self == LensFacing::Front
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensFacing::Back => write!(f, "back"),
            LensFacing::Front => write!(f, "front"),
        }
    }
}

impl std::str::FromStr for LensFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" | "world" => Ok(LensFacing::Back),
            "front" | "user" | "selfie" => Ok(LensFacing::Front),
            other => Err(format!("unknown lens '{}', expected 'back' or 'front'", other)),
        }
    }
}

/// Outcome of an OS-level permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Pixel layouts the V4L2 backend can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Motion JPEG, one JPEG per frame
    Mjpeg,
    /// YUV 4:2:2, Y0 U Y1 V
    Yuyv,
    /// YUV 4:2:2, U Y0 V Y1
    Uyvy,
    /// Packed 24-bit RGB
    Rgb24,
}

impl PixelFormat {
    /// Formats in order of preference for preview and capture
    pub const PREFERRED: [PixelFormat; 4] = [
        PixelFormat::Mjpeg,
        PixelFormat::Yuyv,
        PixelFormat::Uyvy,
        PixelFormat::Rgb24,
    ];

    pub fn fourcc(self) -> [u8; 4] {
        match self {
            PixelFormat::Mjpeg => *b"MJPG",
            PixelFormat::Yuyv => *b"YUYV",
            PixelFormat::Uyvy => *b"UYVY",
            PixelFormat::Rgb24 => *b"RGB3",
        }
    }

    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        Self::PREFERRED.into_iter().find(|f| &f.fourcc() == fourcc)
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fourcc = self.fourcc();
        write!(f, "{}", String::from_utf8_lossy(&fourcc))
    }
}

/// A video capture device and the lens it is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Human readable name (V4L2 card)
    pub name: String,
    /// Device path, e.g. `/dev/video0`
    pub path: String,
    /// Kernel driver (uvcvideo, ...)
    pub driver: String,
    /// Lens this device serves, if any
    pub lens: Option<LensFacing>,
    /// Decodable formats the device advertises
    pub formats: Vec<PixelFormat>,
}

/// A decoded RGBA frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * height * 4` bytes
    pub data: Arc<[u8]>,
    /// Lens that produced the frame
    pub lens: LensFacing,
    pub captured_at: Instant,
}

impl CameraFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, lens: LensFacing) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            lens,
            captured_at: Instant::now(),
        }
    }

    /// Whether the frame was read at or after `since`
    pub fn is_newer_than(&self, since: Instant) -> bool {
        self.captured_at >= since
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_toggle_alternates() {
        let mut lens = LensFacing::default();
        assert_eq!(lens, LensFacing::Back);
        lens = lens.toggled();
        assert_eq!(lens, LensFacing::Front);
        lens = lens.toggled();
        assert_eq!(lens, LensFacing::Back);
    }

    #[test]
    fn test_frame_read_before_request_is_stale() {
        let before = Instant::now();
        let frame = CameraFrame::new(1, 1, vec![0; 4], LensFacing::Back);
        assert!(frame.is_newer_than(before));
        assert!(!frame.is_newer_than(Instant::now() + std::time::Duration::from_secs(1)));
    }

    #[test]
    fn test_lens_parse() {
        assert_eq!("Front".parse::<LensFacing>(), Ok(LensFacing::Front));
        assert_eq!("rear".parse::<LensFacing>(), Ok(LensFacing::Back));
        assert!("sideways".parse::<LensFacing>().is_err());
    }

    #[test]
    fn test_pixel_format_fourcc_lookup() {
        assert_eq!(PixelFormat::from_fourcc(b"YUYV"), Some(PixelFormat::Yuyv));
        assert_eq!(PixelFormat::from_fourcc(b"H264"), None);
        assert_eq!(PixelFormat::Mjpeg.to_string(), "MJPG");
    }
}
