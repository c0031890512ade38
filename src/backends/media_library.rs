// SPDX-License-Identifier: GPL-3.0-only

//! Photo library provider
//!
//! On the desktop the "library" is a directory under the user's Pictures
//! folder. Persisting an image copies the capture there under a timestamped
//! name; the library never overwrites an existing asset.

use crate::backends::camera::PermissionStatus;
use crate::errors::PersistError;
use crate::storage::{self, ImageUri};
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Permission query and asset persistence
pub trait MediaLibraryProvider: Send + Sync {
    /// Ask for write access to the library
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus>;

    /// Store the image behind `uri` as a new asset, returning its location
    fn persist(&self, uri: &ImageUri) -> BoxFuture<'static, Result<PathBuf, PersistError>>;
}

/// Library rooted at a directory, `~/Pictures/snapcam` by default
#[derive(Debug, Clone)]
pub struct PicturesLibrary {
    dir: PathBuf,
}

impl PicturesLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        let dir = config
            .save_directory
            .as_ref()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(storage::default_library_directory);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Create `dir` and verify a file can be created in it
fn check_writable(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(format!(".snapcam-probe-{}", uuid::Uuid::new_v4().simple()));
    std::fs::write(&probe, b"")?;
    std::fs::remove_file(&probe)
}

fn persist_blocking(dir: &Path, uri: &ImageUri) -> Result<PathBuf, PersistError> {
    let source = uri
        .to_file_path()
        .ok_or_else(|| PersistError::InvalidSource(format!("not a local file: {}", uri)))?;
    if !source.is_file() {
        return Err(PersistError::InvalidSource(format!(
            "{} does not exist",
            source.display()
        )));
    }

    std::fs::create_dir_all(dir)?;
    let destination = storage::unique_destination(dir, chrono::Local::now());
    std::fs::copy(&source, &destination)?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        "Image added to library"
    );
    Ok(destination)
}

impl MediaLibraryProvider for PicturesLibrary {
    fn request_permission(&self) -> BoxFuture<'static, PermissionStatus> {
        let dir = self.dir.clone();
        Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || {
                let outcome = check_writable(&dir);
                (dir, outcome)
            })
            .await;

            match result {
                Ok((_, Ok(()))) => PermissionStatus::Granted,
                Ok((dir, Err(e))) => {
                    warn!(dir = %dir.display(), error = %e, "Photo library is not writable");
                    PermissionStatus::Denied
                }
                Err(e) => {
                    warn!(error = %e, "Library permission probe panicked");
                    PermissionStatus::Denied
                }
            }
        })
    }

    fn persist(&self, uri: &ImageUri) -> BoxFuture<'static, Result<PathBuf, PersistError>> {
        let dir = self.dir.clone();
        let uri = uri.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || persist_blocking(&dir, &uri))
                .await
                .map_err(|e| PersistError::Io(e.to_string()))?
        })
    }
}
