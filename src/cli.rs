// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! - Listing capture devices and their lens assignment
//! - Taking a photo without the GUI

use snapcam::backends::camera::{CameraProvider, LensFacing, V4l2Camera};
use snapcam::backends::media_library::{MediaLibraryProvider, PicturesLibrary};
use snapcam::config::Config;
use snapcam::errors::{AppError, AppResult, CameraError};
use snapcam::flash::FlashMode;
use snapcam::storage::{self, ImageUri};
use std::path::{Path, PathBuf};
use tracing::warn;

/// List all capture devices
pub fn list_cameras(json: bool) -> AppResult<()> {
    let config = Config::load();
    let cameras = V4l2Camera::from_config(&config).list_cameras();

    if json {
        let json =
            serde_json::to_string_pretty(&cameras).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        let lens = camera
            .lens
            .map(|lens| lens.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  [{}] {} ({})", lens, camera.name, camera.path);

        let formats: Vec<String> = camera.formats.iter().map(|f| f.to_string()).collect();
        if !formats.is_empty() {
            println!("      Formats: {}", formats.join(", "));
        }
        if !camera.driver.is_empty() {
            println!("      Driver: {}", camera.driver);
        }
        println!();
    }

    Ok(())
}

/// Take a photo with `lens` and store it in the library or at `output`
pub fn take_photo(
    lens: LensFacing,
    flash: bool,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let config = Config::load();
    let camera = V4l2Camera::from_config(&config);
    let library = PicturesLibrary::from_config(&config);
    let flash = if flash { FlashMode::On } else { FlashMode::Off };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if !camera.request_permission().await.is_granted() {
            return Err(AppError::Camera(CameraError::PermissionDenied(
                "camera access was denied".to_string(),
            )));
        }

        println!("Capturing with the {} lens...", lens);
        let image = camera.capture(lens, flash).await?;

        let saved = match output {
            Some(output) => copy_to_output(&image, &output)?,
            None => library.persist(&image).await?,
        };

        if let Some(capture) = image.to_file_path() {
            if let Err(e) = std::fs::remove_file(&capture) {
                warn!(path = %capture.display(), error = %e, "Failed to remove capture");
            }
        }

        println!("Photo saved: {}", saved.display());
        Ok::<(), AppError>(())
    })
}

/// Copy the capture to `output`; a directory gets a timestamped file name
fn copy_to_output(image: &ImageUri, output: &Path) -> AppResult<PathBuf> {
    let source = image
        .to_file_path()
        .ok_or_else(|| AppError::Storage(format!("not a local file: {}", image)))?;

    let destination = if output.is_dir() {
        storage::unique_destination(output, chrono::Local::now())
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        output.to_path_buf()
    };

    std::fs::copy(&source, &destination)?;
    Ok(destination)
}
