// SPDX-License-Identifier: GPL-3.0-only

//! Capability providers used by the capture screen
//!
//! - [`camera`]: preview, still capture and camera permission
//! - [`media_library`]: photo library permission and persistence
//! - [`portal`]: XDG camera portal used inside Flatpak

pub mod camera;
pub mod media_library;
pub mod portal;
