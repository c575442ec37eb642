// SPDX-License-Identifier: GPL-3.0-only

//! Camera, microphone and media library permissions
//!
//! The gate decides routing from a [`PermissionState`]; a [`PermissionBackend`]
//! answers queries and shows prompts where the platform has them.

pub mod portal;
pub mod system;

pub use system::SystemPermissions;

use std::fmt;
use std::future::Future;

/// Answer of the platform for a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet
    #[default]
    NotDetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }

    pub const ALL: [PermissionStatus; 3] = [
        PermissionStatus::Granted,
        PermissionStatus::Denied,
        PermissionStatus::NotDetermined,
    ];
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not determined"),
        }
    }
}

/// The three permissions the gate tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Camera,
    Microphone,
    MediaLibrary,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 3] = [
        PermissionKind::Camera,
        PermissionKind::Microphone,
        PermissionKind::MediaLibrary,
    ];
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Camera => write!(f, "Camera"),
            PermissionKind::Microphone => write!(f, "Microphone"),
            PermissionKind::MediaLibrary => write!(f, "Media library"),
        }
    }
}

/// Snapshot of all permissions
///
/// The media library only distinguishes granted from not granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionState {
    pub camera: PermissionStatus,
    pub microphone: PermissionStatus,
    pub media_library: bool,
}

impl PermissionState {
    /// Status of one permission, mapping the media library flag onto a status
    pub fn status(&self, kind: PermissionKind) -> PermissionStatus {
        match kind {
            PermissionKind::Camera => self.camera,
            PermissionKind::Microphone => self.microphone,
            PermissionKind::MediaLibrary if self.media_library => PermissionStatus::Granted,
            PermissionKind::MediaLibrary => PermissionStatus::NotDetermined,
        }
    }

    /// Record a new answer for one permission
    pub fn set(&mut self, kind: PermissionKind, status: PermissionStatus) {
        match kind {
            PermissionKind::Camera => self.camera = status,
            PermissionKind::Microphone => self.microphone = status,
            PermissionKind::MediaLibrary => self.media_library = status.is_granted(),
        }
    }

    /// The capture screen needs the camera, and an answer (any answer) for the microphone
    pub fn needs_permission_screen(&self) -> bool {
        self.camera != PermissionStatus::Granted
            || self.microphone == PermissionStatus::NotDetermined
    }

    /// Leaving the gate needs everything granted
    pub fn all_granted(&self) -> bool {
        self.camera.is_granted() && self.microphone.is_granted() && self.media_library
    }
}

/// Platform permission access
///
/// Both operations may block on D-Bus or the filesystem, so they are futures
/// the UI runs with `Task::perform`.
pub trait PermissionBackend: Clone + Send + Sync + 'static {
    /// Current status without prompting
    fn query(&self, kind: PermissionKind) -> impl Future<Output = PermissionStatus> + Send;

    /// Prompt the user if the platform supports it, returning the new status
    fn request(&self, kind: PermissionKind) -> impl Future<Output = PermissionStatus> + Send;

    /// Query all three permissions
    fn query_all(&self) -> impl Future<Output = PermissionState> + Send {
        let backend = self.clone();
        async move {
            PermissionState {
                camera: backend.query(PermissionKind::Camera).await,
                microphone: backend.query(PermissionKind::Microphone).await,
                media_library: backend.query(PermissionKind::MediaLibrary).await.is_granted(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_redirect_for_all_combinations() {
        for camera in PermissionStatus::ALL {
            for microphone in PermissionStatus::ALL {
                for media_library in [true, false] {
                    let state = PermissionState {
                        camera,
                        microphone,
                        media_library,
                    };
                    let expected = camera != PermissionStatus::Granted
                        || microphone == PermissionStatus::NotDetermined;
                    assert_eq!(
                        state.needs_permission_screen(),
                        expected,
                        "camera={camera} microphone={microphone} library={media_library}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_denied_microphone_does_not_redirect() {
        let state = PermissionState {
            camera: PermissionStatus::Granted,
            microphone: PermissionStatus::Denied,
            media_library: false,
        };
        assert!(!state.needs_permission_screen());
        assert!(!state.all_granted());
    }

    #[test]
    fn test_set_media_library_maps_to_flag() {
        let mut state = PermissionState::default();
        state.set(PermissionKind::MediaLibrary, PermissionStatus::Granted);
        assert!(state.media_library);
        assert_eq!(state.status(PermissionKind::MediaLibrary), PermissionStatus::Granted);
        state.set(PermissionKind::MediaLibrary, PermissionStatus::Denied);
        assert!(!state.media_library);
    }
}
