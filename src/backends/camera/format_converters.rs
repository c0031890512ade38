// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for V4L2 frames
//!
//! Everything is converted to tightly packed RGBA8 before it reaches the UI
//! or the JPEG encoder.

use super::types::PixelFormat;
use crate::errors::CameraError;

/// Convert a raw V4L2 buffer to RGBA
pub fn decode_to_rgba(
    format: PixelFormat,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(Vec<u8>, u32, u32), CameraError> {
    match format {
        PixelFormat::Mjpeg => mjpeg_to_rgba(data),
        PixelFormat::Yuyv => {
            check_length(format, data, packed_422_len(width, height))?;
            Ok((yuyv_to_rgba(data, width, height), width, height))
        }
        PixelFormat::Uyvy => {
            check_length(format, data, packed_422_len(width, height))?;
            Ok((uyvy_to_rgba(data, width, height), width, height))
        }
        PixelFormat::Rgb24 => {
            let expected = (width * height * 3) as usize;
            check_length(format, data, expected)?;
            Ok((rgb_to_rgba(&data[..expected]), width, height))
        }
    }
}

/// Bytes in a packed 4:2:2 frame; two pixels share one 4-byte group
fn packed_422_len(width: u32, height: u32) -> usize {
    ((width * height) as usize).div_ceil(2) * 4
}

/// Truncated frames are rejected so a short buffer never reaches the UI
fn check_length(format: PixelFormat, data: &[u8], expected: usize) -> Result<(), CameraError> {
    if data.len() < expected {
        return Err(CameraError::InvalidFormat(format!(
            "{} buffer too short: {} < {}",
            format,
            data.len(),
            expected
        )));
    }
    Ok(())
}

/// Decode one MJPEG frame. Dimensions come from the JPEG header.
pub fn mjpeg_to_rgba(data: &[u8]) -> Result<(Vec<u8>, u32, u32), CameraError> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CameraError::InvalidFormat(format!("corrupt MJPEG frame: {}", e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

/// BT.601 YUV to RGBA pixel
#[inline]
fn yuv_pixel(y: f32, u: f32, v: f32) -> [u8; 4] {
    [
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
        255,
    ]
}

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4).take(pixel_count.div_ceil(2)) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        rgba.extend_from_slice(&yuv_pixel(y0, u, v));
        rgba.extend_from_slice(&yuv_pixel(y1, u, v));
    }

    rgba.truncate(pixel_count * 4);
    rgba
}

/// Convert UYVY (YUV 4:2:2) to RGBA
///
/// UYVY format: U0 Y0 V0 Y1 - each 4-byte group encodes 2 pixels.
pub fn uyvy_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4).take(pixel_count.div_ceil(2)) {
        let u = chunk[0] as f32 - 128.0;
        let y0 = chunk[1] as f32;
        let v = chunk[2] as f32 - 128.0;
        let y1 = chunk[3] as f32;

        rgba.extend_from_slice(&yuv_pixel(y0, u, v));
        rgba.extend_from_slice(&yuv_pixel(y1, u, v));
    }

    rgba.truncate(pixel_count * 4);
    rgba
}

/// Convert RGB to RGBA by adding alpha=255
pub fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for chunk in rgb.chunks_exact(3) {
        rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
    }
    rgba
}

/// Flip an RGBA buffer horizontally in place
pub fn mirror_rgba(rgba: &mut [u8], width: u32) {
    let row_len = width as usize * 4;
    if row_len == 0 {
        return;
    }
    for row in rgba.chunks_exact_mut(row_len) {
        let pixels = row.len() / 4;
        for x in 0..pixels / 2 {
            let (left, right) = (x * 4, (pixels - 1 - x) * 4);
            for c in 0..4 {
                row.swap(left + c, right + c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_to_rgba_white() {
        // Y=255, U=V=128 is white
        let yuyv = vec![255u8, 128, 255, 128];
        let rgba = yuyv_to_rgba(&yuyv, 2, 1);

        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] > 250 && rgba[1] > 250 && rgba[2] > 250);
        assert_eq!(rgba[3], 255);
        assert_eq!(rgba[7], 255);
    }

    #[test]
    fn test_uyvy_to_rgba_white() {
        let uyvy = vec![128u8, 255, 128, 255];
        let rgba = uyvy_to_rgba(&uyvy, 2, 1);

        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] > 250);
        assert_eq!(rgba[3], 255);
    }

    #[test]
    fn test_rgb_to_rgba() {
        let rgb = vec![255, 128, 64, 0, 0, 0];
        let rgba = rgb_to_rgba(&rgb);

        assert_eq!(rgba[0..4], [255, 128, 64, 255]);
        assert_eq!(rgba[4..8], [0, 0, 0, 255]);
    }

    #[test]
    fn test_rgb24_short_buffer_is_rejected() {
        assert!(decode_to_rgba(PixelFormat::Rgb24, &[0; 5], 2, 1).is_err());
    }

    #[test]
    fn test_truncated_packed_422_is_rejected() {
        // 4x2 needs 16 bytes; a truncated buffer carries half of that
        let short = [128u8; 8];
        assert!(matches!(
            decode_to_rgba(PixelFormat::Yuyv, &short, 4, 2),
            Err(CameraError::InvalidFormat(_))
        ));
        assert!(decode_to_rgba(PixelFormat::Uyvy, &short, 4, 2).is_err());

        let (rgba, w, h) = decode_to_rgba(PixelFormat::Yuyv, &[128u8; 16], 4, 2).unwrap();
        assert_eq!((w, h), (4, 2));
        assert_eq!(rgba.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_mjpeg_round_trip_dimensions() {
        let img = image::RgbImage::from_pixel(6, 3, image::Rgb([10, 20, 30]));
        let mut jpeg = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();

        let (rgba, w, h) = decode_to_rgba(PixelFormat::Mjpeg, &jpeg, 0, 0).unwrap();
        assert_eq!((w, h), (6, 3));
        assert_eq!(rgba.len(), 6 * 3 * 4);
    }

    #[test]
    fn test_corrupt_mjpeg_is_an_error() {
        assert!(mjpeg_to_rgba(&[0xff, 0xd8, 0x00]).is_err());
    }

    #[test]
    fn test_mirror_rgba_swaps_columns() {
        // 3x1: red, green, blue
        let mut row = vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255];
        mirror_rgba(&mut row, 3);
        assert_eq!(row, vec![0, 0, 255, 255, 0, 255, 0, 255, 255, 0, 0, 255]);
    }
}
