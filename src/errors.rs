// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application
//!
//! Every failure path returns control to an existing screen, so these errors are
//! carried into messages (as `String` or typed values) and surfaced as dialogs or
//! toasts instead of aborting.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Permission-related errors
    Permission(PermissionError),
    /// Photo capture errors
    Capture(CaptureError),
    /// Media library and temporary file errors
    Storage(StorageError),
    /// Route could not be parsed or is missing parameters
    Navigation(String),
    /// Generic error with message
    Other(String),
}

/// Permission backend errors
///
/// A denial is not an error: it comes back as `PermissionStatus::Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The desktop portal could not be reached
    PortalUnavailable(String),
    /// The portal answered with something we could not interpret
    InvalidResponse(String),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No camera device is active
    NoDevice,
    /// The preview has not delivered a frame yet
    NotReady,
    /// A capture is already in flight
    Busy,
    /// JPEG encoding failed
    EncodingFailed(String),
    /// Writing the temporary capture file failed
    WriteFailed(String),
}

/// Media library and temporary capture file errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The source media file does not exist
    SourceMissing(String),
    /// The library directory could not be resolved or created
    LibraryUnavailable(String),
    /// Copying into the library failed
    CopyFailed(String),
    /// Removing a temporary capture failed
    RemoveFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Permission(e) => write!(f, "Permission error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Navigation(msg) => write!(f, "Navigation error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::PortalUnavailable(msg) => write!(f, "Portal unavailable: {}", msg),
            PermissionError::InvalidResponse(msg) => write!(f, "Invalid portal response: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoDevice => write!(f, "No camera device is active"),
            CaptureError::NotReady => write!(f, "Camera is not ready yet"),
            CaptureError::Busy => write!(f, "A capture is already in progress"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SourceMissing(path) => write!(f, "Media file not found: {}", path),
            StorageError::LibraryUnavailable(msg) => write!(f, "Library unavailable: {}", msg),
            StorageError::CopyFailed(msg) => write!(f, "Copy failed: {}", msg),
            StorageError::RemoveFailed(msg) => write!(f, "Remove failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PermissionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for StorageError {}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::EncodingFailed(err.to_string())
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::WriteFailed(err.to_string())
    }
}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::PortalUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_domain() {
        let err: AppError = CaptureError::NotReady.into();
        assert_eq!(err.to_string(), "Capture error: Camera is not ready yet");

        let err: AppError = StorageError::SourceMissing("/tmp/x.jpg".into()).into();
        assert!(err.to_string().contains("/tmp/x.jpg"));
    }

    #[test]
    fn test_io_error_becomes_write_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(CaptureError::from(io), CaptureError::WriteFailed(_)));
    }
}
