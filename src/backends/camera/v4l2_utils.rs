// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device discovery and lens assignment

use super::types::{CameraDevice, LensFacing, PermissionStatus, PixelFormat};
use crate::errors::CameraError;
use tracing::debug;
use v4l::prelude::*;
use v4l::video::Capture;

/// List `/dev/video*` nodes in numeric order
fn video_nodes() -> Vec<String> {
    let mut nodes: Vec<(u32, String)> = std::fs::read_dir("/dev")
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let index = name.strip_prefix("video")?.parse::<u32>().ok()?;
            Some((index, format!("/dev/{}", name)))
        })
        .collect();
    nodes.sort();
    nodes.into_iter().map(|(_, path)| path).collect()
}

/// Query a node and return it if it is a capture device with a decodable format.
///
/// Metadata nodes (a UVC camera exposes two) and output-only devices are skipped.
pub fn probe_device(path: &str) -> Result<Option<CameraDevice>, CameraError> {
    let dev = Device::with_path(path)?;
    let caps = dev.query_caps()?;

    if !caps
        .capabilities
        .contains(v4l::capability::Flags::VIDEO_CAPTURE)
    {
        debug!(path, card = %caps.card, "Not a video capture node");
        return Ok(None);
    }

    let formats: Vec<PixelFormat> = dev
        .enum_formats()?
        .iter()
        .filter_map(|desc| PixelFormat::from_fourcc(&desc.fourcc.repr))
        .collect();

    if formats.is_empty() {
        debug!(path, card = %caps.card, "No decodable pixel format");
        return Ok(None);
    }

    Ok(Some(CameraDevice {
        name: caps.card,
        path: path.to_string(),
        driver: caps.driver,
        lens: None,
        formats,
    }))
}

/// Enumerate capture devices the current user can open
pub fn enumerate_capture_devices() -> Vec<CameraDevice> {
    video_nodes()
        .iter()
        .filter_map(|path| match probe_device(path) {
            Ok(device) => device,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping video node");
                None
            }
        })
        .collect()
}

/// Outcome of probing `/dev/video*` for access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAccess {
    /// At least one capture device opened
    Accessible,
    /// Nodes exist but every open was refused
    Denied,
    /// No video nodes at all
    NoDevices,
}

/// Check whether any capture device can be opened by this process
pub fn probe_access() -> DeviceAccess {
    let nodes = video_nodes();
    if nodes.is_empty() {
        return DeviceAccess::NoDevices;
    }

    let mut refused = false;
    for path in &nodes {
        match probe_device(path) {
            Ok(Some(_)) => return DeviceAccess::Accessible,
            Ok(None) => {}
            Err(CameraError::PermissionDenied(_)) => refused = true,
            Err(_) => {}
        }
    }

    if refused {
        DeviceAccess::Denied
    } else {
        DeviceAccess::NoDevices
    }
}

/// Combine the portal answer (if one was asked) with what we can open.
///
/// A portal grant alone is not enough: frames are read from `/dev/video*`,
/// which a sandbox without device access still hides.
pub fn permission_status(portal_grant: Option<bool>, access: DeviceAccess) -> PermissionStatus {
    match (portal_grant, access) {
        (Some(false), _) => PermissionStatus::Denied,
        (_, DeviceAccess::Accessible) => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}

fn lens_hint(name: &str) -> Option<LensFacing> {
    let name = name.to_ascii_lowercase();
    if ["front", "user", "selfie"].iter().any(|k| name.contains(k)) {
        Some(LensFacing::Front)
    } else if ["back", "rear", "world"].iter().any(|k| name.contains(k)) {
        Some(LensFacing::Back)
    } else {
        None
    }
}

/// Whether a configured path (possibly a `/dev/v4l/by-id` symlink) names this node
fn same_node(device_path: &str, configured: &str) -> bool {
    if device_path == configured {
        return true;
    }
    match (
        std::fs::canonicalize(device_path),
        std::fs::canonicalize(configured),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Assign lenses to devices.
///
/// Priority: configured paths, then lens words in the card name, then order
/// of discovery (first free device is back, next one is front).
pub fn assign_lenses(devices: &mut [CameraDevice], back: Option<&str>, front: Option<&str>) {
    for device in devices.iter_mut() {
        device.lens = None;
        if back.is_some_and(|p| same_node(&device.path, p)) {
            device.lens = Some(LensFacing::Back);
        } else if front.is_some_and(|p| same_node(&device.path, p)) {
            device.lens = Some(LensFacing::Front);
        }
    }

    for lens in [LensFacing::Back, LensFacing::Front] {
        if devices.iter().any(|d| d.lens == Some(lens)) {
            continue;
        }
        if let Some(device) = devices
            .iter_mut()
            .find(|d| d.lens.is_none() && lens_hint(&d.name) == Some(lens))
        {
            device.lens = Some(lens);
        }
    }

    for lens in [LensFacing::Back, LensFacing::Front] {
        if devices.iter().any(|d| d.lens == Some(lens)) {
            continue;
        }
        if let Some(device) = devices.iter_mut().find(|d| d.lens.is_none()) {
            device.lens = Some(lens);
        }
    }
}

/// Device serving `lens`
pub fn device_for_lens(
    devices: &[CameraDevice],
    lens: LensFacing,
) -> Result<&CameraDevice, CameraError> {
    if devices.is_empty() {
        return Err(CameraError::NoCameraFound);
    }
    devices
        .iter()
        .find(|d| d.lens == Some(lens))
        .ok_or(CameraError::LensUnavailable(lens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, path: &str) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            driver: "uvcvideo".to_string(),
            lens: None,
            formats: vec![PixelFormat::Mjpeg],
        }
    }

    #[test]
    fn test_discovery_order_assigns_back_then_front() {
        let mut devices = vec![device("Integrated", "/dev/video0"), device("USB", "/dev/video2")];
        assign_lenses(&mut devices, None, None);
        assert_eq!(devices[0].lens, Some(LensFacing::Back));
        assert_eq!(devices[1].lens, Some(LensFacing::Front));
    }

    #[test]
    fn test_name_hints_beat_order() {
        let mut devices = vec![
            device("ov5640 front", "/dev/video0"),
            device("imx258 rear", "/dev/video1"),
        ];
        assign_lenses(&mut devices, None, None);
        assert_eq!(devices[0].lens, Some(LensFacing::Front));
        assert_eq!(devices[1].lens, Some(LensFacing::Back));
    }

    #[test]
    fn test_configured_paths_win() {
        let mut devices = vec![device("A back", "/dev/video0"), device("B", "/dev/video4")];
        assign_lenses(&mut devices, Some("/dev/video4"), Some("/dev/video0"));
        assert_eq!(devices[0].lens, Some(LensFacing::Front));
        assert_eq!(devices[1].lens, Some(LensFacing::Back));
    }

    #[test]
    fn test_single_device_has_no_front_lens() {
        let mut devices = vec![device("Webcam", "/dev/video0")];
        assign_lenses(&mut devices, None, None);

        assert!(device_for_lens(&devices, LensFacing::Back).is_ok());
        assert_eq!(
            device_for_lens(&devices, LensFacing::Front),
            Err(CameraError::LensUnavailable(LensFacing::Front))
        );
        assert_eq!(
            device_for_lens(&[], LensFacing::Back),
            Err(CameraError::NoCameraFound)
        );
    }

    #[test]
    fn test_portal_grant_needs_an_openable_device() {
        assert_eq!(
            permission_status(Some(true), DeviceAccess::Accessible),
            PermissionStatus::Granted
        );
        assert_eq!(
            permission_status(Some(true), DeviceAccess::NoDevices),
            PermissionStatus::Denied
        );
        assert_eq!(
            permission_status(Some(false), DeviceAccess::Accessible),
            PermissionStatus::Denied
        );
        assert_eq!(
            permission_status(None, DeviceAccess::Accessible),
            PermissionStatus::Granted
        );
        assert_eq!(
            permission_status(None, DeviceAccess::Denied),
            PermissionStatus::Denied
        );
    }
}
