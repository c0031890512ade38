// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::DEFAULT_NOTICE_TIMEOUT_SECS;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Application id, also the config namespace
pub const APP_ID: &str = "io.github.snapcam.Snapcam";

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Device used for the back lens (e.g. `/dev/video0`); auto-detected when unset
    pub back_camera_path: Option<String>,
    /// Device used for the front lens; auto-detected when unset
    pub front_camera_path: Option<String>,
    /// Photo library directory; `~/Pictures/snapcam` when unset
    pub save_directory: Option<String>,
    /// Mirror the live preview of the front lens
    pub mirror_front_preview: bool,
    /// Seconds a notice stays on screen
    pub notice_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            back_camera_path: None,
            front_camera_path: None,
            save_directory: None,
            mirror_front_preview: true,
            notice_timeout_secs: DEFAULT_NOTICE_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Notice timeout, never shorter than one second
    pub fn notice_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.notice_timeout_secs.max(1))
    }

    /// Whether `other` maps lenses to different devices
    pub fn camera_differs(&self, other: &Config) -> bool {
        self.back_camera_path != other.back_camera_path
            || self.front_camera_path != other.front_camera_path
    }

    /// Whether `other` stores photos somewhere else
    pub fn library_differs(&self, other: &Config) -> bool {
        self.save_directory != other.save_directory
    }

    /// Load the stored config, falling back to defaults on errors
    pub fn load() -> Config {
        match cosmic_config::Config::new(APP_ID, Config::VERSION) {
            Ok(handler) => match Config::get_entry(&handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    error!(?errors, "Errors loading config");
                    config
                }
            },
            Err(err) => {
                error!(%err, "Failed to create config handler");
                Config::default()
            }
        }
    }
}
