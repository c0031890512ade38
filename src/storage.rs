// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for captured images
//!
//! Captures are written as JPEG into a per-user cache directory and passed
//! around as `file://` URIs until the photo library takes a copy.

use crate::backends::camera::CameraFrame;
use crate::errors::CaptureError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FILE_SCHEME: &str = "file://";

/// Reference to a captured image
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageUri(String);

impl ImageUri {
    /// Wrap an existing URI string
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` URI for a local path.
    ///
    /// Paths are produced by this crate and never need percent-encoding.
    pub fn from_path(path: &Path) -> Self {
        Self(format!("{}{}", FILE_SCHEME, path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local path behind a `file://` URI, `None` for any other scheme
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.0
            .strip_prefix(FILE_SCHEME)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

impl std::fmt::Display for ImageUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default photo library directory (~/Pictures/snapcam)
pub fn default_library_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapcam")
}

/// Directory holding captures that have not been saved yet
pub fn capture_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("snapcam")
        .join("captures")
}

/// Remove leftover captures from previous sessions.
///
/// Returns the number of files removed.
pub fn clear_capture_cache(dir: &Path) -> std::io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove stale capture"),
        }
    }

    debug!(dir = %dir.display(), removed, "Capture cache cleared");
    Ok(removed)
}

/// Library file name for an asset taken at `now`, e.g. `IMG_20240131_235959.jpg`
pub fn timestamped_name(now: DateTime<Local>) -> String {
    format!("IMG_{}.jpg", now.format("%Y%m%d_%H%M%S"))
}

/// First free path in `dir` for an asset taken at `now`.
///
/// Appends `_1`, `_2`, ... when several pictures are saved within one second.
pub fn unique_destination(dir: &Path, now: DateTime<Local>) -> PathBuf {
    let name = timestamped_name(now);
    let candidate = dir.join(&name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name.trim_end_matches(".jpg");
    (1u32..)
        .map(|n| dir.join(format!("{}_{}.jpg", stem, n)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Encode an RGBA frame as JPEG into `dir` and return its URI
pub fn write_capture(frame: &CameraFrame, dir: &Path) -> Result<ImageUri, CaptureError> {
    use image::codecs::jpeg::JpegEncoder;

    std::fs::create_dir_all(dir)?;

    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| {
            CaptureError::EncodingFailed(format!(
                "frame buffer does not match {}x{}",
                frame.width, frame.height
            ))
        })?;
    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let path = dir.join(format!("capture_{}.jpg", uuid::Uuid::new_v4().simple()));
    let file = std::fs::File::create(&path)?;
    let mut writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, crate::constants::JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;
    std::io::Write::flush(&mut writer)?;

    info!(
        path = %path.display(),
        width = frame.width,
        height = frame.height,
        lens = %frame.lens,
        "Capture written"
    );
    Ok(ImageUri::from_path(&path))
}

/// Decode a captured image for on-screen preview.
///
/// `mirrored` flips the displayed pixels only; the file stays untouched.
pub async fn load_display_image(
    uri: ImageUri,
    mirrored: bool,
) -> Option<cosmic::widget::image::Handle> {
    let (rgba, width, height) = load_display_pixels(uri, mirrored).await?;
    Some(cosmic::widget::image::Handle::from_rgba(width, height, rgba))
}

/// RGBA pixels of a captured image as the preview shows them
pub async fn load_display_pixels(uri: ImageUri, mirrored: bool) -> Option<(Vec<u8>, u32, u32)> {
    let path = uri.to_file_path()?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read captured image");
            return None;
        }
    };

    let (rgba, width, height) = tokio::task::spawn_blocking(move || {
        let img = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!(error = %e, "Failed to decode captured image");
                return None;
            }
        };
        let img = if mirrored { img.fliph() } else { img };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Some((rgba.into_raw(), width, height))
    })
    .await
    .ok()??;

    debug!(%uri, width, height, mirrored, "Loaded captured image for preview");
    Some((rgba, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapcam-{}-{}", tag, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_uri_round_trips_local_path() {
        let uri = ImageUri::from_path(Path::new("/tmp/a.jpg"));
        assert_eq!(uri.as_str(), "file:///tmp/a.jpg");
        assert_eq!(uri.to_file_path(), Some(PathBuf::from("/tmp/a.jpg")));
    }

    #[test]
    fn test_non_file_uri_has_no_path() {
        assert_eq!(ImageUri::new("content://media/1").to_file_path(), None);
        assert_eq!(ImageUri::new("file://").to_file_path(), None);
    }

    #[test]
    fn test_timestamped_name() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 58).unwrap();
        assert_eq!(timestamped_name(now), "IMG_20240131_235958.jpg");
    }

    #[test]
    fn test_unique_destination_never_overwrites() {
        let dir = scratch_dir("unique");
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let first = unique_destination(&dir, now);
        std::fs::write(&first, b"x").unwrap();
        let second = unique_destination(&dir, now);

        assert_ne!(first, second);
        assert!(second.ends_with("IMG_20240501_120000_1.jpg"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_capture_produces_jpeg() {
        let dir = scratch_dir("capture");
        let frame = CameraFrame::new(
            4,
            2,
            vec![200; 4 * 2 * 4],
            crate::backends::camera::LensFacing::Back,
        );

        let uri = write_capture(&frame, &dir).unwrap();
        let path = uri.to_file_path().unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));

        assert_eq!(clear_capture_cache(&dir).unwrap(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_capture_rejects_short_buffer() {
        let dir = scratch_dir("short");
        let frame = CameraFrame::new(4, 4, vec![0; 8], crate::backends::camera::LensFacing::Back);
        assert!(matches!(
            write_capture(&frame, &dir),
            Err(CaptureError::EncodingFailed(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_clear_missing_cache_is_noop() {
        let dir = std::env::temp_dir().join(format!("snapcam-missing-{}", uuid::Uuid::new_v4()));
        assert_eq!(clear_capture_cache(&dir).unwrap(), 0);
    }

    /// 16x8 frame, red on the left half and blue on the right
    fn split_frame(lens: crate::backends::camera::LensFacing) -> CameraFrame {
        let (width, height) = (16u32, 8u32);
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    data.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    data.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        CameraFrame::new(width, height, data, lens)
    }

    fn is_red(px: &[u8]) -> bool {
        px[0] > 180 && px[2] < 80
    }

    fn is_blue(px: &[u8]) -> bool {
        px[2] > 180 && px[0] < 80
    }

    #[tokio::test]
    async fn test_front_preview_is_mirrored_but_file_is_not() {
        let dir = scratch_dir("mirror");
        let uri = write_capture(
            &split_frame(crate::backends::camera::LensFacing::Front),
            &dir,
        )
        .unwrap();

        let (plain, width, _) = load_display_pixels(uri.clone(), false).await.unwrap();
        let (flipped, _, _) = load_display_pixels(uri.clone(), true).await.unwrap();
        let last = ((width - 1) * 4) as usize;

        assert!(is_red(&plain[0..4]) && is_blue(&plain[last..last + 4]));
        assert!(is_blue(&flipped[0..4]) && is_red(&flipped[last..last + 4]));

        // The stored asset keeps the sensor orientation
        let stored = image::open(uri.to_file_path().unwrap()).unwrap().to_rgba8();
        assert!(is_red(&stored.get_pixel(0, 0).0));
        assert!(is_blue(&stored.get_pixel(width - 1, 0).0));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_capture_has_no_preview() {
        let uri = ImageUri::from_path(&std::env::temp_dir().join(format!(
            "snapcam-gone-{}.jpg",
            uuid::Uuid::new_v4()
        )));
        assert!(load_display_pixels(uri, true).await.is_none());
    }
}
