//! Per-user image store on the local filesystem.
//!
//! Layout: `<root>/<user id>/<unix millis>-<original file name>`. A name
//! already taken in that millisecond becomes `<unix millis>-<n>-<name>`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::config::StorageConfig;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// File name used when an upload has none.
pub const UNNAMED_FILE: &str = "unnamed-file";

/// Check a user id and return it trimmed.
///
/// Ids become directory names, so anything that could escape the store root
/// is rejected.
pub fn validate_user_id(user_id: &str) -> Result<&str> {
    let id = user_id.trim();
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.chars().any(|c| c == '/' || c == '\\' || c == '\0');

    if invalid {
        return Err(StoreError::InvalidUserId(user_id.to_string()));
    }
    Ok(id)
}

/// A user directory and how many images it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImages {
    pub user_id: String,
    pub images: usize,
}

/// Filesystem-backed image store.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ImageStore {
    /// Create a store with the default image extensions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: StorageConfig::default().extensions,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            root: config.images_dir.clone(),
            extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a user's images.
    pub fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_user_id(user_id)?))
    }

    /// True when the path has one of the configured image extensions.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|x| *x == e))
    }

    /// Store uploaded bytes under a timestamped name.
    pub fn save(&self, user_id: &str, original_name: Option<&str>, data: &[u8]) -> Result<PathBuf> {
        let dir = self.user_dir(user_id)?;
        fs::create_dir_all(&dir)?;

        let (destination, mut file) = create_unique(&dir, original_name)?;
        file.write_all(data)?;

        debug!("Saved {} bytes to {}", data.len(), destination.display());
        Ok(destination)
    }

    /// Copy an existing file into the store.
    pub fn import(&self, user_id: &str, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(StoreError::NotAFile(source.display().to_string()));
        }

        let dir = self.user_dir(user_id)?;
        fs::create_dir_all(&dir)?;

        let name = source.file_name().and_then(|n| n.to_str());
        let (destination, mut file) = create_unique(&dir, name)?;
        io::copy(&mut File::open(source)?, &mut file)?;

        info!("Imported {} as {}", source.display(), destination.display());
        Ok(destination)
    }

    /// A user's images in directory-listing order.
    ///
    /// A user with no directory has no images.
    pub fn list_images(&self, user_id: &str) -> Result<Vec<PathBuf>> {
        let dir = self.user_dir(user_id)?;
        if !dir.is_dir() {
            debug!("No image directory for user {}", user_id.trim());
            return Ok(Vec::new());
        }

        let mut images = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && self.is_image(&path) {
                images.push(path);
            }
        }
        Ok(images)
    }

    /// All users with an image directory, sorted by id.
    pub fn list_users(&self) -> Result<Vec<UserImages>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(user_id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let images = self.list_images(&user_id)?.len();
            users.push(UserImages { user_id, images });
        }

        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    /// Delete a user's directory, returning how many images it held.
    pub fn remove_user(&self, user_id: &str) -> Result<usize> {
        let dir = self.user_dir(user_id)?;
        if !dir.is_dir() {
            return Err(StoreError::UserNotFound(user_id.trim().to_string()));
        }

        let count = self.list_images(user_id)?.len();
        fs::remove_dir_all(&dir)?;

        info!("Removed {} images for user {}", count, user_id.trim());
        Ok(count)
    }
}

/// Create a new file named after the upload, never replacing an existing one.
///
/// Only the final path component of `original_name` is kept.
fn create_unique(dir: &Path, original_name: Option<&str>) -> Result<(PathBuf, File)> {
    let name = original_name
        .and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNNAMED_FILE);
    let stamp = Utc::now().timestamp_millis();

    let mut attempt = 0u32;
    loop {
        let stored = match attempt {
            0 => format!("{}-{}", stamp, name),
            n => format!("{}-{}-{}", stamp, n, name),
        };
        let path = dir.join(stored);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{} exists, trying another name", path.display());
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
