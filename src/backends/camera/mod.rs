// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   Capture screen    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← enumerate, zoom, exposure
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!  ┌────────┐  ┌────────┐
//!  │PipeWire│  │  V4L2  │  ← discovery; ioctls on the V4L2 node for controls
//!  └────────┘  └────────┘
//! ```
//!
//! Live frames come from [`preview::PreviewPipeline`], which is owned by the
//! preview subscription rather than by the backend.

pub mod pipewire;
pub mod preview;
pub mod types;
pub mod v4l2_controls;
pub mod v4l2_utils;

pub use types::*;

use crate::constants::pipeline;
use tracing::{debug, info, warn};

/// Where a requested adjustment ended up being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The device control was set
    Hardware,
    /// The device has no control; the preview pipeline emulates it
    Software,
}

/// Camera backend trait
///
/// Implementations enumerate devices and forward zoom/exposure settings.
/// They never own the preview stream.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras, front and back
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Forward a zoom factor (already clamped to the device range)
    fn apply_zoom(&self, device: &CameraDevice, level: f32) -> BackendResult<Applied>;

    /// Forward an exposure bias in EV, unmodified
    fn apply_exposure_bias(&self, device: &CameraDevice, ev: f32) -> BackendResult<Applied>;
}

/// Backend for the running system: PipeWire discovery with a V4L2 fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCameraBackend;

impl SystemCameraBackend {
    pub fn new() -> Self {
        Self
    }

    fn enumerate_pipewire(&self) -> Option<Vec<CameraDevice>> {
        let nodes = pipewire::list_nodes(pipeline::VIDEO_SOURCE_CLASS)?;
        if nodes.is_empty() {
            return None;
        }

        let devices = nodes
            .into_iter()
            .map(|node| {
                let props = pipewire::node_properties(&node.id);
                let facing = Facing::from_location(
                    props.get("api.libcamera.location").map(String::as_str),
                );
                let control_path = node.v4l2_path().map(str::to_string);
                let mut formats = pipewire::node_formats(&node.id).unwrap_or_else(fallback_formats);
                sort_formats(&mut formats);

                let source = CameraSource::PipeWire {
                    serial: node.serial.clone().unwrap_or_else(|| node.id.clone()),
                };
                build_device(node.display_name(), facing, source, control_path, formats)
            })
            .collect();
        Some(devices)
    }

    fn enumerate_v4l2(&self) -> Vec<CameraDevice> {
        v4l2_utils::enumerate_capture_nodes()
            .into_iter()
            .map(|node| {
                let mut formats = fallback_formats();
                sort_formats(&mut formats);
                let name = if node.card.is_empty() {
                    node.path.clone()
                } else {
                    node.card.clone()
                };
                build_device(
                    name,
                    // Plain V4L2 gives no location; treat every node as the main camera
                    Facing::Back,
                    CameraSource::V4l2 {
                        device: node.path.clone(),
                    },
                    Some(node.path),
                    formats,
                )
            })
            .collect()
    }
}

impl CameraBackend for SystemCameraBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let devices = self
            .enumerate_pipewire()
            .unwrap_or_else(|| self.enumerate_v4l2());
        info!(count = devices.len(), "Enumerated cameras");
        for device in &devices {
            debug!(
                name = %device.name,
                facing = %device.facing,
                source = %device.source,
                hardware_zoom = device.zoom.is_hardware(),
                hardware_exposure = device.exposure.is_some(),
                "Camera"
            );
        }
        devices
    }

    fn apply_zoom(&self, device: &CameraDevice, level: f32) -> BackendResult<Applied> {
        match (&device.control_path, device.zoom.hardware_base) {
            (Some(path), Some(base)) => {
                let raw = v4l2_controls::zoom_factor_to_raw(level, base);
                v4l2_controls::set_control(path, v4l2_controls::V4L2_CID_ZOOM_ABSOLUTE, raw)
                    .map_err(BackendError::IoError)?;
                Ok(Applied::Hardware)
            }
            _ => Ok(Applied::Software),
        }
    }

    fn apply_exposure_bias(&self, device: &CameraDevice, ev: f32) -> BackendResult<Applied> {
        match (&device.control_path, device.exposure) {
            (Some(path), Some(range)) if range.hardware => {
                let raw = v4l2_controls::exposure_bias_to_raw(ev);
                v4l2_controls::set_control(path, v4l2_controls::V4L2_CID_AUTO_EXPOSURE_BIAS, raw)
                    .map_err(BackendError::IoError)?;
                Ok(Applied::Hardware)
            }
            _ => Ok(Applied::Software),
        }
    }
}

/// Assemble a device, querying control ranges on its V4L2 node
fn build_device(
    name: String,
    facing: Facing,
    source: CameraSource,
    control_path: Option<String>,
    formats: Vec<DeviceFormat>,
) -> CameraDevice {
    let zoom = control_path
        .as_deref()
        .and_then(v4l2_controls::query_zoom_range)
        .unwrap_or_else(ZoomRange::digital);
    let exposure = control_path
        .as_deref()
        .and_then(v4l2_controls::query_exposure_range);

    if control_path.is_none() {
        warn!(name = %name, "No V4L2 node for camera, zoom and exposure are software only");
    }

    CameraDevice {
        name,
        facing,
        source,
        control_path,
        zoom,
        exposure,
        formats,
    }
}

/// Common formats assumed when the device cannot be queried
fn fallback_formats() -> Vec<DeviceFormat> {
    [(1920, 1080), (1280, 720), (640, 480)]
        .into_iter()
        .map(|(photo_width, photo_height)| DeviceFormat {
            photo_width,
            photo_height,
            max_fps: 30,
        })
        .collect()
}

/// First device with the requested facing
pub fn first_with_facing(devices: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    devices.iter().find(|d| d.facing == facing)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A device with digital zoom and no exposure control
    pub fn device(name: &str, facing: Facing) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            facing,
            source: CameraSource::V4l2 {
                device: format!("/dev/{}", name),
            },
            control_path: None,
            zoom: ZoomRange::digital(),
            exposure: None,
            formats: vec![DeviceFormat {
                photo_width: 1920,
                photo_height: 1080,
                max_fps: 30,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::device;
    use super::*;

    #[test]
    fn test_devices_without_controls_fall_back_to_software() {
        let backend = SystemCameraBackend::new();
        let cam = device("video0", Facing::Back);
        assert_eq!(backend.apply_zoom(&cam, 2.0).unwrap(), Applied::Software);
        assert_eq!(
            backend.apply_exposure_bias(&cam, -1.0).unwrap(),
            Applied::Software
        );
    }

    #[test]
    fn test_first_with_facing() {
        let devices = vec![
            device("video0", Facing::Back),
            device("video2", Facing::Front),
            device("video4", Facing::Front),
        ];
        assert_eq!(first_with_facing(&devices, Facing::Front).unwrap().name, "video2");
        assert!(first_with_facing(&devices[..1], Facing::Front).is_none());
    }
}
