// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera provider
//!
//! Preview runs on a dedicated thread per lens that decodes mmap buffers to
//! RGBA and pushes them into a bounded channel. The newest frame of each lens
//! is kept so a capture can reuse it instead of reopening a device the
//! preview already holds.

use super::format_converters::decode_to_rgba;
use super::types::{CameraDevice, CameraFrame, LensFacing, PermissionStatus, PixelFormat};
use super::v4l2_utils::{self, DeviceAccess};
use super::CameraProvider;
use crate::backends::portal;
use crate::constants::{preview, timing};
use crate::errors::{CameraError, CaptureError};
use crate::flash::{FlashDevice, FlashGuard, FlashMode};
use crate::storage::{self, ImageUri};
use futures::StreamExt;
use futures::channel::mpsc;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Camera provider backed by `/dev/video*`
#[derive(Clone)]
pub struct V4l2Camera {
    inner: Arc<Inner>,
}

struct Inner {
    /// Configured device for the back lens
    back_path: Option<String>,
    /// Configured device for the front lens
    front_path: Option<String>,
    /// Where captures are written before they are saved
    capture_dir: PathBuf,
    /// Newest preview frame per lens
    latest: Mutex<HashMap<LensFacing, Arc<CameraFrame>>>,
    /// Writable flash LEDs, empty on most desktops
    flash_leds: Vec<FlashDevice>,
}

impl V4l2Camera {
    pub fn new(back_path: Option<String>, front_path: Option<String>, capture_dir: PathBuf) -> Self {
        let flash_leds = FlashDevice::discover();
        info!(
            back = ?back_path,
            front = ?front_path,
            flash_leds = flash_leds.len(),
            "V4L2 camera provider ready"
        );
        Self {
            inner: Arc::new(Inner {
                back_path,
                front_path,
                capture_dir,
                latest: Mutex::new(HashMap::new()),
                flash_leds,
            }),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.back_camera_path.clone(),
            config.front_camera_path.clone(),
            storage::capture_cache_directory(),
        )
    }
}

/// Open `device` with the best decodable format.
///
/// Returns the device and the format the driver actually applied.
fn open_device(device: &CameraDevice) -> Result<(Device, PixelFormat, u32, u32), CameraError> {
    let dev = Device::with_path(&device.path)?;

    let wanted = PixelFormat::PREFERRED
        .into_iter()
        .find(|f| device.formats.contains(f))
        .ok_or_else(|| {
            CameraError::InvalidFormat(format!("{} offers no decodable format", device.path))
        })?;

    let requested = Format::new(preview::WIDTH, preview::HEIGHT, FourCC::new(&wanted.fourcc()));
    let actual = dev.set_format(&requested)?;
    let applied = PixelFormat::from_fourcc(&actual.fourcc.repr).ok_or_else(|| {
        CameraError::InvalidFormat(format!("driver switched to {}", actual.fourcc))
    })?;

    info!(
        path = %device.path,
        name = %device.name,
        format = %applied,
        width = actual.width,
        height = actual.height,
        "Camera opened"
    );
    Ok((dev, applied, actual.width, actual.height))
}

impl Inner {
    fn latest_frames(&self) -> MutexGuard<'_, HashMap<LensFacing, Arc<CameraFrame>>> {
        match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn devices(&self) -> Vec<CameraDevice> {
        let mut devices = v4l2_utils::enumerate_capture_devices();
        v4l2_utils::assign_lenses(
            &mut devices,
            self.back_path.as_deref(),
            self.front_path.as_deref(),
        );
        devices
    }

    fn resolve(&self, lens: LensFacing) -> Result<CameraDevice, CameraError> {
        let devices = self.devices();
        v4l2_utils::device_for_lens(&devices, lens).cloned()
    }

    fn run_preview(&self, lens: LensFacing, mut sender: mpsc::Sender<Arc<CameraFrame>>) {
        info!(%lens, "Preview started");
        while !sender.is_closed() {
            match self.stream_frames(lens, &mut sender) {
                Ok(()) => break,
                Err(e) => {
                    warn!(%lens, error = %e, "Preview failed, retrying");
                    std::thread::sleep(timing::PREVIEW_RETRY);
                }
            }
        }
        info!(%lens, "Preview stopped");
    }

    /// Forward frames until the receiver goes away
    fn stream_frames(
        &self,
        lens: LensFacing,
        sender: &mut mpsc::Sender<Arc<CameraFrame>>,
    ) -> Result<(), CameraError> {
        let device = self.resolve(lens)?;
        let (dev, format, width, height) = open_device(&device)?;
        let mut stream = Stream::with_buffers(&dev, Type::VideoCapture, preview::STREAM_BUFFERS)?;

        loop {
            let (buf, meta) = stream.next()?;
            let used = (meta.bytesused as usize).min(buf.len());
            let frame = match decode_to_rgba(format, &buf[..used], width, height) {
                Ok((rgba, w, h)) => Arc::new(CameraFrame::new(w, h, rgba, lens)),
                Err(e) => {
                    debug!(%lens, error = %e, "Dropping undecodable frame");
                    continue;
                }
            };

            self.latest_frames().insert(lens, Arc::clone(&frame));

            if let Err(e) = sender.try_send(frame) {
                if e.is_disconnected() {
                    return Ok(());
                }
                // UI is behind; the frame is dropped
            }
        }
    }

    /// Newest frame of `lens` taken at or after `since`
    fn frame_since(&self, lens: LensFacing, since: Instant) -> Option<Arc<CameraFrame>> {
        self.latest_frames()
            .get(&lens)
            .filter(|frame| frame.is_newer_than(since))
            .cloned()
    }

    fn wait_for_frame(
        &self,
        lens: LensFacing,
        since: Instant,
        timeout: Duration,
    ) -> Option<Arc<CameraFrame>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(frame) = self.frame_since(lens, since) {
                return Some(frame);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(timing::FRAME_POLL);
        }
    }

    /// Open the device and take one frame after a short warm-up
    fn grab_direct(&self, lens: LensFacing) -> Result<CameraFrame, CaptureError> {
        let device = self.resolve(lens)?;
        let (dev, format, width, height) = open_device(&device)?;
        let mut stream = Stream::with_buffers(&dev, Type::VideoCapture, preview::STREAM_BUFFERS)
            .map_err(CameraError::from)?;

        let deadline = Instant::now() + timing::DIRECT_CAPTURE_TIMEOUT;
        let mut seen = 0usize;
        while Instant::now() < deadline {
            let (buf, meta) = stream.next().map_err(CameraError::from)?;
            seen += 1;
            if seen <= timing::WARMUP_FRAMES {
                continue;
            }
            let used = (meta.bytesused as usize).min(buf.len());
            match decode_to_rgba(format, &buf[..used], width, height) {
                Ok((rgba, w, h)) => return Ok(CameraFrame::new(w, h, rgba, lens)),
                Err(e) => debug!(%lens, error = %e, "Dropping undecodable frame"),
            }
        }

        Err(CaptureError::NoFrameAvailable)
    }

    fn capture_blocking(&self, lens: LensFacing, flash: FlashMode) -> Result<ImageUri, CaptureError> {
        let requested_at = Instant::now();

        let flash_guard = if flash.is_on() && !self.flash_leds.is_empty() {
            Some(FlashGuard::fire(&self.flash_leds))
        } else {
            if flash.is_on() {
                debug!("No flash LED, relying on the on-screen flash");
            }
            None
        };

        // A lit capture needs a frame exposed after the LED came up
        let since = if flash_guard.is_some() {
            std::thread::sleep(timing::FLASH_SETTLE);
            Instant::now()
        } else {
            requested_at
                .checked_sub(timing::FRESH_FRAME_MAX_AGE)
                .unwrap_or(requested_at)
        };

        let frame = match self.wait_for_frame(lens, since, timing::FRESH_FRAME_MAX_AGE) {
            Some(frame) => {
                debug!(%lens, "Capturing from live preview");
                frame
            }
            None => {
                debug!(%lens, "No live preview frame, opening device");
                Arc::new(self.grab_direct(lens)?)
            }
        };
        drop(flash_guard);

        storage::write_capture(&frame, &self.capture_dir)
    }
}

impl CameraProvider for V4l2Camera {
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        Box::pin(async move {
            let portal_grant = if portal::is_sandboxed() {
                match portal::access_camera().await {
                    Ok(granted) => Some(granted),
                    Err(e) => {
                        warn!(error = %e, "Camera portal request failed");
                        return PermissionStatus::Denied;
                    }
                }
            } else {
                None
            };
            if portal_grant == Some(false) {
                info!("Camera portal refused access");
                return PermissionStatus::Denied;
            }

            let access = match tokio::task::spawn_blocking(v4l2_utils::probe_access).await {
                Ok(access) => access,
                Err(e) => {
                    error!(error = %e, "Camera access probe panicked");
                    return PermissionStatus::Denied;
                }
            };
            if access != DeviceAccess::Accessible {
                info!(?access, ?portal_grant, "No accessible camera device");
            }
            v4l2_utils::permission_status(portal_grant, access)
        })
    }

    fn capture(
        &self,
        lens: LensFacing,
        flash: FlashMode,
    ) -> BoxFuture<'static, Result<ImageUri, CaptureError>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || inner.capture_blocking(lens, flash))
                .await
                .map_err(|e| CaptureError::Camera(CameraError::BackendError(e.to_string())))?
        })
    }

    fn preview(&self, lens: LensFacing) -> BoxStream<'static, Arc<CameraFrame>> {
        let (sender, receiver) = mpsc::channel(preview::CHANNEL_CAPACITY);
        let inner = Arc::clone(&self.inner);

        if let Err(e) = std::thread::Builder::new()
            .name(format!("preview-{}", lens))
            .spawn(move || inner.run_preview(lens, sender))
        {
            error!(%lens, error = %e, "Failed to spawn preview thread");
        }

        receiver.boxed()
    }

    fn list_cameras(&self) -> Vec<CameraDevice> {
        self.inner.devices()
    }
}
