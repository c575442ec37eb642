// SPDX-License-Identifier: GPL-3.0-only

//! Permission backend for the running desktop session

use super::{PermissionBackend, PermissionKind, PermissionStatus, portal};
use crate::backends::audio;
use crate::backends::camera::v4l2_utils;
use crate::constants::{app_info, files};
use std::ffi::CString;
use std::future::Future;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Answers permission queries the way the desktop enforces them
///
/// - camera: the XDG portal inside Flatpak, device node access otherwise
/// - microphone: whether PipeWire exposes an audio source
/// - media library: whether the photo folder is writable
#[derive(Debug, Clone)]
pub struct SystemPermissions {
    photo_dir: PathBuf,
    sandboxed: bool,
    /// Last portal answer in this session (the portal has no query call)
    portal_answer: Arc<Mutex<Option<PermissionStatus>>>,
}

impl SystemPermissions {
    pub fn new(photo_dir: PathBuf) -> Self {
        Self {
            photo_dir,
            sandboxed: app_info::is_flatpak(),
            portal_answer: Arc::new(Mutex::new(None)),
        }
    }

    fn recorded_portal_answer(&self) -> PermissionStatus {
        self.portal_answer
            .lock()
            .ok()
            .and_then(|guard| *guard)
            .unwrap_or(PermissionStatus::NotDetermined)
    }

    fn record_portal_answer(&self, status: PermissionStatus) {
        if let Ok(mut guard) = self.portal_answer.lock() {
            *guard = Some(status);
        }
    }

    async fn camera_status(&self, prompt: bool) -> PermissionStatus {
        if !self.sandboxed {
            return blocking(native_camera_status).await;
        }
        if !prompt {
            return self.recorded_portal_answer();
        }
        let status = match portal::access_camera().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Camera portal request failed");
                PermissionStatus::Denied
            }
        };
        self.record_portal_answer(status);
        status
    }

    async fn media_library_status(&self) -> PermissionStatus {
        let dir = self.photo_dir.clone();
        blocking(move || media_library_status(&dir)).await
    }

    async fn status(&self, kind: PermissionKind, prompt: bool) -> PermissionStatus {
        let status = match kind {
            PermissionKind::Camera => self.camera_status(prompt).await,
            PermissionKind::Microphone => blocking(microphone_status).await,
            PermissionKind::MediaLibrary => self.media_library_status().await,
        };
        info!(%kind, %status, prompt, "Permission status");
        status
    }
}

impl PermissionBackend for SystemPermissions {
    fn query(&self, kind: PermissionKind) -> impl Future<Output = PermissionStatus> + Send {
        let this = self.clone();
        async move { this.status(kind, false).await }
    }

    fn request(&self, kind: PermissionKind) -> impl Future<Output = PermissionStatus> + Send {
        let this = self.clone();
        async move { this.status(kind, true).await }
    }
}

async fn blocking<F>(f: F) -> PermissionStatus
where
    F: FnOnce() -> PermissionStatus + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or(PermissionStatus::NotDetermined)
}

/// Camera status from the device nodes (native sessions)
fn native_camera_status() -> PermissionStatus {
    let nodes = v4l2_utils::video_device_paths();
    let accessible = nodes.iter().filter(|p| is_read_writable(p)).count();
    camera_status_from_nodes(nodes.len(), accessible)
}

/// No nodes: nothing to decide yet. Nodes but none usable: the OS said no.
pub fn camera_status_from_nodes(total: usize, accessible: usize) -> PermissionStatus {
    match (total, accessible) {
        (0, _) => PermissionStatus::NotDetermined,
        (_, 0) => PermissionStatus::Denied,
        _ => PermissionStatus::Granted,
    }
}

fn is_read_writable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

fn microphone_status() -> PermissionStatus {
    microphone_status_from_sources(audio::enumerate_microphones().map(|d| d.len()))
}

/// `None` means the audio server could not be asked
pub fn microphone_status_from_sources(sources: Option<usize>) -> PermissionStatus {
    match sources {
        None => PermissionStatus::NotDetermined,
        Some(0) => PermissionStatus::Denied,
        Some(_) => PermissionStatus::Granted,
    }
}

/// Granted when the folder exists (or can be created) and accepts a write
pub fn media_library_status(dir: &Path) -> PermissionStatus {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Cannot create media folder");
        return PermissionStatus::Denied;
    }
    let probe = dir.join(files::PROBE_FILE_NAME);
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            if let Err(e) = std::fs::remove_file(&probe) {
                warn!(path = %probe.display(), error = %e, "Failed to remove probe file");
            }
            PermissionStatus::Granted
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Media folder is not writable");
            PermissionStatus::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_status_from_nodes() {
        assert_eq!(camera_status_from_nodes(0, 0), PermissionStatus::NotDetermined);
        assert_eq!(camera_status_from_nodes(2, 0), PermissionStatus::Denied);
        assert_eq!(camera_status_from_nodes(2, 1), PermissionStatus::Granted);
    }

    #[test]
    fn test_microphone_status_from_sources() {
        assert_eq!(microphone_status_from_sources(None), PermissionStatus::NotDetermined);
        assert_eq!(microphone_status_from_sources(Some(0)), PermissionStatus::Denied);
        assert_eq!(microphone_status_from_sources(Some(3)), PermissionStatus::Granted);
    }

    #[test]
    fn test_media_library_creates_folder_and_cleans_probe() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Pictures").join("VisionCam");
        assert_eq!(media_library_status(&dir), PermissionStatus::Granted);
        assert!(dir.is_dir());
        assert!(!dir.join(files::PROBE_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_unprompted_portal_query_uses_session_answer() {
        let mut perms = SystemPermissions::new(PathBuf::from("/tmp"));
        perms.sandboxed = true;
        assert_eq!(perms.camera_status(false).await, PermissionStatus::NotDetermined);
        perms.record_portal_answer(PermissionStatus::Denied);
        assert_eq!(perms.camera_status(false).await, PermissionStatus::Denied);
    }
}
