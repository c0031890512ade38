// SPDX-License-Identifier: MPL-2.0

//! Capture screen controls
//!
//! - Icon button (icon plus optional label)

pub mod icon_button;

pub use icon_button::{IconButton, IconId, icon_button};
