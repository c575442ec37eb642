// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the capture directory and the media library

use std::time::Duration;
use visioncam::errors::StorageError;
use visioncam::storage::{self, LibraryFolders, MediaKind, MediaLibrary};

#[tokio::test]
async fn test_save_copies_into_library_folder() {
    let root = tempfile::tempdir().unwrap();
    let captures = root.path().join("captures");
    std::fs::create_dir_all(&captures).unwrap();
    let source = captures.join("IMG_20240101_120000.000.jpg");
    std::fs::write(&source, b"jpeg bytes").unwrap();

    let library = LibraryFolders {
        photos: root.path().join("Pictures/VisionCam"),
        videos: root.path().join("Videos/VisionCam"),
    };
    let saved = library.save(source.clone(), MediaKind::Photo).await.unwrap();

    assert!(saved.starts_with(&library.photos));
    assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"jpeg bytes");
    assert!(source.exists(), "saving copies, the capture is removed separately");
}

#[tokio::test]
async fn test_save_missing_source_fails() {
    let root = tempfile::tempdir().unwrap();
    let result =
        storage::save_to_folder(&root.path().join("gone.jpg"), root.path(), MediaKind::Photo)
            .await;
    assert!(matches!(result, Err(StorageError::SourceMissing(_))));
}

#[tokio::test]
async fn test_remove_capture_only_inside_capture_dir() {
    let root = tempfile::tempdir().unwrap();
    let captures = root.path().join("captures");
    std::fs::create_dir_all(&captures).unwrap();
    let inside = captures.join("IMG_1.jpg");
    let outside = root.path().join("IMG_2.jpg");
    std::fs::write(&inside, b"x").unwrap();
    std::fs::write(&outside, b"x").unwrap();

    assert!(storage::remove_capture(&inside, &captures).await.unwrap());
    assert!(!inside.exists());

    assert!(!storage::remove_capture(&outside, &captures).await.unwrap());
    assert!(outside.exists());

    // Already gone is not an error
    assert!(!storage::remove_capture(&inside, &captures).await.unwrap());
}

#[test]
fn test_purge_keeps_recent_captures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("IMG_recent.jpg"), b"x").unwrap();

    assert_eq!(
        storage::purge_stale_captures(dir.path(), Duration::from_secs(3600)),
        0
    );
    assert!(dir.path().join("IMG_recent.jpg").exists());
    assert_eq!(
        storage::purge_stale_captures(&dir.path().join("missing"), Duration::ZERO),
        0
    );
}
