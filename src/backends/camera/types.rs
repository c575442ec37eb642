// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which side of the device a camera looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    /// Parse libcamera's `api.libcamera.location` value
    ///
    /// External and unknown locations count as back-facing: a USB webcam is the
    /// "main" camera of a desktop.
    pub fn from_location(location: Option<&str>) -> Self {
        match location.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("front") => Facing::Front,
            _ => Facing::Back,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

/// Zoom factors supported by a device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
    /// Un-zoomed factor, used when the device becomes active
    pub neutral: f32,
    /// Raw control value corresponding to 1x, when the zoom is a V4L2 control
    pub hardware_base: Option<f32>,
}

impl ZoomRange {
    /// Range used for devices without a zoom control (crop-based zoom)
    pub fn digital() -> Self {
        use crate::constants::zoom;
        Self {
            min: zoom::DIGITAL_MIN,
            max: zoom::DIGITAL_MAX,
            neutral: zoom::NEUTRAL,
            hardware_base: None,
        }
    }

    pub fn is_hardware(&self) -> bool {
        self.hardware_base.is_some()
    }

    /// Clamp a requested factor into the range
    pub fn clamp(&self, level: f32) -> f32 {
        level.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::digital()
    }
}

/// Exposure bias range in EV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureRange {
    pub min: f32,
    pub max: f32,
    /// True when the bias is a V4L2 control, false for software gain
    pub hardware: bool,
}

impl ExposureRange {
    /// Range shown when the device does not report one
    pub fn fallback() -> Self {
        use crate::constants::exposure;
        Self {
            min: exposure::FALLBACK_MIN_EV,
            max: exposure::FALLBACK_MAX_EV,
            hardware: false,
        }
    }
}

/// A still-capture format reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFormat {
    pub photo_width: u32,
    pub photo_height: u32,
    pub max_fps: u32,
}

impl DeviceFormat {
    pub fn pixels(&self) -> u64 {
        self.photo_width as u64 * self.photo_height as u64
    }
}

impl std::fmt::Display for DeviceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} @ {}fps",
            self.photo_width, self.photo_height, self.max_fps
        )
    }
}

/// How the preview pipeline reaches the device
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CameraSource {
    /// PipeWire node, addressed by object serial
    PipeWire { serial: String },
    /// Plain V4L2 device node
    V4l2 { device: String },
}

impl CameraSource {
    /// GStreamer source element with its addressing property
    pub fn gst_source(&self) -> String {
        match self {
            CameraSource::PipeWire { serial } => format!("pipewiresrc target-object={}", serial),
            CameraSource::V4l2 { device } => format!("v4l2src device={}", device),
        }
    }
}

impl std::fmt::Display for CameraSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraSource::PipeWire { serial } => write!(f, "pipewire:{}", serial),
            CameraSource::V4l2 { device } => write!(f, "{}", device),
        }
    }
}

/// A camera device as presented to the capture screen
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDevice {
    pub name: String,
    pub facing: Facing,
    pub source: CameraSource,
    /// V4L2 node used for zoom/exposure ioctls
    pub control_path: Option<String>,
    pub zoom: ZoomRange,
    pub exposure: Option<ExposureRange>,
    /// Sorted largest photo size first
    pub formats: Vec<DeviceFormat>,
}

impl CameraDevice {
    /// Largest photo format, shown in the info panel
    pub fn primary_format(&self) -> Option<&DeviceFormat> {
        self.formats.first()
    }

    /// Exposure range for the slider, reported or fallback
    pub fn exposure_range(&self) -> ExposureRange {
        self.exposure.unwrap_or_else(ExposureRange::fallback)
    }

    /// Stable identity used to key the preview subscription
    pub fn id(&self) -> String {
        self.source.to_string()
    }
}

/// Sort formats largest photo size first, then fastest
pub fn sort_formats(formats: &mut Vec<DeviceFormat>) {
    formats.sort_by(|a, b| {
        b.pixels()
            .cmp(&a.pixels())
            .then_with(|| b.max_fps.cmp(&a.max_fps))
    });
    formats.dedup_by(|a, b| a.photo_width == b.photo_width && a.photo_height == b.photo_height);
}

/// A single RGBA preview frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA pixels (stride == width * 4)
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Failed to initialize backend
    InitializationFailed(String),
    /// General I/O error
    IoError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_from_location() {
        assert_eq!(Facing::from_location(Some("front")), Facing::Front);
        assert_eq!(Facing::from_location(Some("Back")), Facing::Back);
        assert_eq!(Facing::from_location(Some("external")), Facing::Back);
        assert_eq!(Facing::from_location(None), Facing::Back);
    }

    #[test]
    fn test_sort_formats_largest_first() {
        let mut formats = vec![
            DeviceFormat { photo_width: 640, photo_height: 480, max_fps: 30 },
            DeviceFormat { photo_width: 1920, photo_height: 1080, max_fps: 30 },
            DeviceFormat { photo_width: 1920, photo_height: 1080, max_fps: 60 },
        ];
        sort_formats(&mut formats);
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].photo_width, 1920);
        assert_eq!(formats[0].max_fps, 60);
    }

    #[test]
    fn test_zoom_clamp() {
        let range = ZoomRange::digital();
        assert_eq!(range.clamp(10.0), 4.0);
        assert_eq!(range.clamp(0.1), 1.0);
    }

    #[test]
    fn test_backend_error_display() {
        assert_eq!(
            BackendError::IoError("pw-cli not found".into()).to_string(),
            "I/O error: pw-cli not found"
        );
        assert!(
            BackendError::InitializationFailed("no appsink".into())
                .to_string()
                .starts_with("Initialization failed")
        );
    }
}
