// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for captured and saved media
//!
//! Captures are first written to a private capture directory; saving copies
//! them into the user's library folders.

use crate::constants::{APP_ID, files};
use crate::errors::StorageError;
use crate::photo::capture_file_name;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Kind of captured media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Parse the `type` route parameter; anything else is not media we can show
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(MediaKind::Photo),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

/// A file produced by the shutter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMedia {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// Directory for unsaved captures
pub fn capture_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_ID)
        .join(files::CAPTURE_DIR_NAME)
}

/// Library folders that saved media goes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFolders {
    pub photos: PathBuf,
    pub videos: PathBuf,
}

impl LibraryFolders {
    /// `~/Pictures/<folder>` and `~/Videos/<folder>`
    pub fn for_user(folder_name: &str) -> Self {
        let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            photos: dirs::picture_dir()
                .unwrap_or_else(|| home.join("Pictures"))
                .join(folder_name),
            videos: dirs::video_dir()
                .unwrap_or_else(|| home.join("Videos"))
                .join(folder_name),
        }
    }

    pub fn folder_for(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Photo => &self.photos,
            MediaKind::Video => &self.videos,
        }
    }
}

/// Where saved media ends up
pub trait MediaLibrary: Clone + Send + Sync + 'static {
    /// Save a copy of `source`, returning the library path
    fn save(
        &self,
        source: PathBuf,
        kind: MediaKind,
    ) -> impl Future<Output = Result<PathBuf, StorageError>> + Send;
}

impl MediaLibrary for LibraryFolders {
    fn save(
        &self,
        source: PathBuf,
        kind: MediaKind,
    ) -> impl Future<Output = Result<PathBuf, StorageError>> + Send {
        let folder = self.folder_for(kind).to_path_buf();
        async move { save_to_folder(&source, &folder, kind).await }
    }
}

/// Copy a file into a folder under a fresh timestamped name
pub async fn save_to_folder(
    source: &Path,
    folder: &Path,
    kind: MediaKind,
) -> Result<PathBuf, StorageError> {
    if !tokio::fs::try_exists(source).await.unwrap_or(false) {
        return Err(StorageError::SourceMissing(source.display().to_string()));
    }

    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| StorageError::LibraryUnavailable(format!("{}: {}", folder.display(), e)))?;

    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(match kind {
            MediaKind::Photo => "jpg",
            MediaKind::Video => "mp4",
        });
    let prefix = match kind {
        MediaKind::Photo => files::PHOTO_PREFIX,
        MediaKind::Video => files::VIDEO_PREFIX,
    };
    let destination = folder.join(capture_file_name(prefix, extension));

    tokio::fs::copy(source, &destination)
        .await
        .map_err(|e| StorageError::CopyFailed(e.to_string()))?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        "Saved media to library"
    );
    Ok(destination)
}

/// True when `path` names a file inside `dir` (no `..` escapes)
pub fn is_inside(path: &Path, dir: &Path) -> bool {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return false;
    }
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir) && path != dir,
        _ => path.starts_with(dir) && path != dir,
    }
}

/// Delete a temporary capture; files outside the capture directory are left alone
///
/// Returns whether a file was removed.
pub async fn remove_capture(path: &Path, capture_dir: &Path) -> Result<bool, StorageError> {
    if !is_inside(path, capture_dir) {
        debug!(path = %path.display(), "Not a temporary capture, keeping it");
        return Ok(false);
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed temporary capture");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::RemoveFailed(e.to_string())),
    }
}

/// Remove captures older than `max_age` (blocking); returns how many were removed
pub fn purge_stale_captures(capture_dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(capture_dir) else {
        return 0;
    };
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_stale = entry
            .metadata()
            .ok()
            .filter(|m| m.is_file())
            .and_then(|m| m.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age >= max_age);
        if !is_stale {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to purge capture"),
        }
    }

    if removed > 0 {
        info!(removed, dir = %capture_dir.display(), "Purged stale captures");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parse() {
        assert_eq!(MediaKind::parse("photo"), Some(MediaKind::Photo));
        assert_eq!(MediaKind::parse("video"), Some(MediaKind::Video));
        assert_eq!(MediaKind::parse("Photo"), None);
        assert_eq!(MediaKind::parse("audio"), None);
    }

    #[test]
    fn test_is_inside_rejects_escapes() {
        let dir = Path::new("/var/cache/app/captures");
        assert!(is_inside(&dir.join("IMG_1.jpg"), dir));
        assert!(!is_inside(&dir.join("../IMG_1.jpg"), dir));
        assert!(!is_inside(Path::new("/home/u/Pictures/a.jpg"), dir));
        assert!(!is_inside(dir, dir));
    }

    #[test]
    fn test_purge_zero_age_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("IMG_a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("IMG_b.jpg"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        assert_eq!(purge_stale_captures(dir.path(), Duration::ZERO), 2);
        assert!(dir.path().join("sub").exists());
        assert_eq!(
            purge_stale_captures(dir.path(), Duration::from_secs(3600)),
            0
        );
    }
}
