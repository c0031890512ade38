// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// JPEG quality for captured stills (0-100)
pub const JPEG_QUALITY: u8 = 92;

/// Capture timing
pub mod timing {
    use super::Duration;

    /// A preview frame older than this is not reused for a capture
    pub const FRESH_FRAME_MAX_AGE: Duration = Duration::from_millis(250);

    /// Frames dropped after opening a device so exposure can settle
    pub const WARMUP_FRAMES: usize = 5;

    /// Give up on a direct (preview-less) capture after this long
    pub const DIRECT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Time the flash LED burns before the frame is taken
    pub const FLASH_SETTLE: Duration = Duration::from_millis(300);

    /// Poll interval while waiting for a preview frame lit by the flash
    pub const FRAME_POLL: Duration = Duration::from_millis(16);

    /// Pause before reopening a device after the preview loop failed
    pub const PREVIEW_RETRY: Duration = Duration::from_secs(2);
}

/// Live preview
pub mod preview {
    /// Frames buffered between the capture thread and the UI
    pub const CHANNEL_CAPACITY: usize = 4;

    /// V4L2 mmap buffers per stream
    pub const STREAM_BUFFERS: u32 = 4;

    /// Requested preview resolution; the driver picks the nearest match
    pub const WIDTH: u32 = 1280;
    pub const HEIGHT: u32 = 720;
}

/// UI layout constants
pub mod ui {
    /// Icon size inside an icon button
    pub const ICON_SIZE: u16 = 28;

    /// Height of an icon button
    pub const BUTTON_HEIGHT: f32 = 40.0;

    /// Gap between icon and label
    pub const LABEL_SPACING: u16 = 10;

    /// Label text size
    pub const LABEL_TEXT_SIZE: u16 = 16;

    /// Default icon tint (#f1f1f1) when none is given
    pub const DEFAULT_TINT: (f32, f32, f32) = (0.945, 0.945, 0.945);

    /// Tint of a control that is not available right now
    pub const DISABLED_ALPHA: f32 = 0.3;

    /// Horizontal padding of the top overlay and the image preview controls
    pub const CONTROL_PADDING_H: u16 = 40;

    /// Top padding of the overlay controls on the live preview
    pub const OVERLAY_PADDING_TOP: u16 = 40;

    /// Vertical padding of the bottom control bar
    pub const BAR_PADDING_V: u16 = 12;

    /// Overlay container background transparency
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Corner radius of the live preview
    pub const PREVIEW_RADIUS: f32 = 20.0;
}

/// Seconds a notice stays visible unless configured otherwise
pub const DEFAULT_NOTICE_TIMEOUT_SECS: u64 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_settles_before_direct_capture_gives_up() {
        assert!(timing::FLASH_SETTLE < timing::DIRECT_CAPTURE_TIMEOUT);
        assert!(timing::FRAME_POLL < timing::FRESH_FRAME_MAX_AGE);
    }

    #[test]
    fn test_jpeg_quality_in_range() {
        assert!((1..=100).contains(&JPEG_QUALITY));
    }
}
