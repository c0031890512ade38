// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode and hardware flash LED control via Linux sysfs
//!
//! LEDs are discovered at `/sys/class/leds/*:flash` and driven in torch mode
//! through the `brightness` file, which is group-writable on phones running
//! `feedbackd`. Machines without such an LED fall back to the on-screen flash.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LEDS_DIR: &str = "/sys/class/leds";

/// Flash setting applied to captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashMode {
    /// Flash does not fire
    #[default]
    Off,
    /// Flash fires during capture
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// A writable flash LED
#[derive(Debug, Clone)]
pub struct FlashDevice {
    /// Sysfs path, e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    /// Maximum value accepted by the `brightness` file
    max_brightness: u32,
    /// Directory basename
    name: String,
}

impl FlashDevice {
    /// Scan `/sys/class/leds/` for writable `*:flash` entries
    pub fn discover() -> Vec<FlashDevice> {
        Self::discover_in(Path::new(LEDS_DIR))
    }

    /// Scan a sysfs-like LED directory
    pub fn discover_in(leds_dir: &Path) -> Vec<FlashDevice> {
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            debug!(dir = %leds_dir.display(), "No LED class directory, flash LED unavailable");
            return Vec::new();
        };

        let mut devices: Vec<FlashDevice> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.ends_with(":flash") {
                    return None;
                }
                Self::probe(entry.path(), name)
            })
            .collect();

        // white before yellow
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }

    fn probe(path: PathBuf, name: String) -> Option<FlashDevice> {
        let max_path = path.join("max_brightness");
        let max_brightness = match std::fs::read_to_string(&max_path) {
            Ok(s) => match s.trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_path.display(), "Invalid max_brightness value");
                    return None;
                }
            },
            Err(e) => {
                warn!(path = %max_path.display(), error = %e, "Cannot read max_brightness");
                return None;
            }
        };

        let brightness_path = path.join("brightness");
        if let Err(e) = std::fs::OpenOptions::new()
            .write(true)
            .open(&brightness_path)
        {
            warn!(
                path = %brightness_path.display(),
                error = %e,
                "Flash LED found but not writable, user may need to be in the 'feedbackd' group"
            );
            return None;
        }

        info!(name = %name, max_brightness, "Discovered flash LED");
        Some(FlashDevice {
            path,
            max_brightness,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }

    /// Turn on at a fraction of max brightness (0.0 = off, 1.0 = full)
    pub fn torch(&self, intensity: f32) -> io::Result<()> {
        let value = (intensity.clamp(0.0, 1.0) * self.max_brightness as f32).round() as u32;
        self.set_brightness(value)
    }
}

/// Keeps the flash LEDs lit until dropped
pub struct FlashGuard<'a> {
    devices: &'a [FlashDevice],
}

impl<'a> FlashGuard<'a> {
    /// Light every device at full brightness
    pub fn fire(devices: &'a [FlashDevice]) -> Self {
        for dev in devices {
            if let Err(e) = dev.torch(1.0) {
                warn!(device = %dev.name, error = %e, "Failed to turn on flash LED");
            }
        }
        Self { devices }
    }
}

impl Drop for FlashGuard<'_> {
    fn drop(&mut self) {
        for dev in self.devices {
            if let Err(e) = dev.off() {
                warn!(device = %dev.name, error = %e, "Failed to turn off flash LED");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_led(root: &Path, name: &str, max: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("max_brightness"), max).unwrap();
        std::fs::write(dir.join("brightness"), "0").unwrap();
        dir
    }

    #[test]
    fn test_flash_toggle_alternates() {
        let mut mode = FlashMode::default();
        assert_eq!(mode, FlashMode::Off);
        mode = mode.toggled();
        assert!(mode.is_on());
        mode = mode.toggled();
        assert_eq!(mode, FlashMode::Off);
    }

    #[test]
    fn test_discover_and_fire_sysfs_leds() {
        let root = std::env::temp_dir().join(format!("snapcam-leds-{}", uuid::Uuid::new_v4()));
        let white = fake_led(&root, "white:flash", "255\n");
        fake_led(&root, "red:status", "1");
        fake_led(&root, "broken:flash", "0");

        let devices = FlashDevice::discover_in(&root);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name(), "white:flash");

        {
            let _guard = FlashGuard::fire(&devices);
            let lit = std::fs::read_to_string(white.join("brightness")).unwrap();
            assert_eq!(lit, "255");
        }
        let dark = std::fs::read_to_string(white.join("brightness")).unwrap();
        assert_eq!(dark, "0");

        std::fs::remove_dir_all(&root).unwrap();
    }
}
