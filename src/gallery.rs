// SPDX-License-Identifier: GPL-3.0-only

//! System gallery shortcut

use crate::constants::gallery;
use std::path::Path;
use tracing::{info, warn};

/// Platform families with distinct gallery apps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "ios" => Platform::Ios,
            "android" => Platform::Android,
            _ => Platform::Desktop,
        }
    }
}

/// URI that opens the photo gallery on a platform
///
/// Desktops have no gallery app of their own, so the photo folder is opened in
/// the file manager.
pub fn gallery_uri(platform: Platform, photo_dir: &Path) -> String {
    match platform {
        Platform::Ios => gallery::IOS_URI.to_string(),
        Platform::Android => gallery::ANDROID_URI.to_string(),
        Platform::Desktop => url::Url::from_directory_path(photo_dir)
            .map(|u| u.to_string())
            .unwrap_or_else(|()| format!("file://{}", photo_dir.display())),
    }
}

/// Open the gallery; failures are logged and otherwise ignored
pub fn open_system_gallery(photo_dir: &Path) {
    let uri = gallery_uri(Platform::current(), photo_dir);
    info!(uri = %uri, "Opening system gallery");
    if let Err(e) = open::that_detached(&uri) {
        warn!(uri = %uri, error = %e, "Failed to open gallery");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_uris() {
        let dir = Path::new("/home/u/Pictures/VisionCam");
        assert_eq!(gallery_uri(Platform::Ios, dir), "photos-redirect://");
        assert_eq!(
            gallery_uri(Platform::Android, dir),
            "content://media/external/images/media"
        );
    }

    #[test]
    fn test_desktop_uri_is_file_url() {
        let uri = gallery_uri(Platform::Desktop, Path::new("/home/u/Pictures/Vision Cam"));
        assert_eq!(uri, "file:///home/u/Pictures/Vision%20Cam/");
    }
}
