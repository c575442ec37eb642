// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera control interface
//!
//! Queries and sets the two controls the capture screen drives: absolute zoom
//! and exposure bias. Everything else is left to the driver's automatic modes.

use super::types::{ExposureRange, ZoomRange};
use std::fs::File;
use std::os::unix::io::AsRawFd;
use tracing::{debug, warn};

const V4L2_CTRL_CLASS_CAMERA: u32 = 0x009a0000;
const V4L2_CID_CAMERA_CLASS_BASE: u32 = V4L2_CTRL_CLASS_CAMERA | 0x900;

/// Optical/digital zoom, driver-defined units
pub const V4L2_CID_ZOOM_ABSOLUTE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 13;
/// Exposure compensation (EV bias) in 0.001 EV units
pub const V4L2_CID_AUTO_EXPOSURE_BIAS: u32 = V4L2_CID_CAMERA_CLASS_BASE + 19;

/// Exposure bias control units per EV
pub const EXPOSURE_BIAS_UNITS_PER_EV: f32 = 1000.0;

const V4L2_CTRL_FLAG_DISABLED: u32 = 0x0001;

// (dir << 30) | (size << 16) | ('V' << 8) | nr
const VIDIOC_S_CTRL: libc::c_ulong = 0xC008561C;
const VIDIOC_QUERYCTRL: libc::c_ulong = 0xC0445624;

#[repr(C)]
struct V4l2Control {
    id: u32,
    value: i32,
}

#[repr(C)]
struct V4l2Queryctrl {
    id: u32,
    ctrl_type: u32,
    name: [u8; 32],
    minimum: i32,
    maximum: i32,
    step: i32,
    default_value: i32,
    flags: u32,
    reserved: [u32; 2],
}

/// Range and default of an integer control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInfo {
    pub id: u32,
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
    pub default_value: i32,
    pub flags: u32,
}

impl ControlInfo {
    /// Check if control is disabled
    pub fn is_disabled(&self) -> bool {
        self.flags & V4L2_CTRL_FLAG_DISABLED != 0
    }

    /// Usable controls are enabled and span more than one value
    pub fn is_usable(&self) -> bool {
        !self.is_disabled() && self.maximum > self.minimum
    }

    /// Zoom range as factors relative to the control default
    ///
    /// Drivers report zoom in arbitrary units; the default value is treated as 1x.
    pub fn zoom_range(&self) -> Option<ZoomRange> {
        if !self.is_usable() {
            return None;
        }
        let base = if self.default_value > 0 {
            self.default_value
        } else if self.minimum > 0 {
            self.minimum
        } else {
            return None;
        } as f32;
        Some(ZoomRange {
            min: self.minimum as f32 / base,
            max: self.maximum as f32 / base,
            neutral: self.default_value.max(self.minimum) as f32 / base,
            hardware_base: Some(base),
        })
    }

    /// Exposure bias range in EV
    pub fn exposure_range(&self) -> Option<ExposureRange> {
        if !self.is_usable() {
            return None;
        }
        Some(ExposureRange {
            min: self.minimum as f32 / EXPOSURE_BIAS_UNITS_PER_EV,
            max: self.maximum as f32 / EXPOSURE_BIAS_UNITS_PER_EV,
            hardware: true,
        })
    }
}

/// Query if a control exists and get its information
pub fn query_control(device_path: &str, control_id: u32) -> Option<ControlInfo> {
    let file = File::open(device_path).ok()?;
    let fd = file.as_raw_fd();

    let mut qctrl = V4l2Queryctrl {
        id: control_id,
        ctrl_type: 0,
        name: [0; 32],
        minimum: 0,
        maximum: 0,
        step: 0,
        default_value: 0,
        flags: 0,
        reserved: [0; 2],
    };

    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCTRL, &mut qctrl as *mut V4l2Queryctrl) };

    if result < 0 {
        return None;
    }

    Some(ControlInfo {
        id: qctrl.id,
        minimum: qctrl.minimum,
        maximum: qctrl.maximum,
        step: qctrl.step,
        default_value: qctrl.default_value,
        flags: qctrl.flags,
    })
}

/// Set value of a control
pub fn set_control(device_path: &str, control_id: u32, value: i32) -> Result<(), String> {
    let file = File::open(device_path).map_err(|e| format!("Failed to open device: {}", e))?;
    let fd = file.as_raw_fd();

    let mut ctrl = V4l2Control {
        id: control_id,
        value,
    };

    let result = unsafe { libc::ioctl(fd, VIDIOC_S_CTRL, &mut ctrl as *mut V4l2Control) };

    if result < 0 {
        let errno = std::io::Error::last_os_error();
        warn!(
            device_path,
            control_id,
            value,
            ?errno,
            "Failed to set V4L2 control"
        );
        return Err(format!("Failed to set control: {}", errno));
    }

    if ctrl.value != value {
        debug!(
            device_path,
            control_id,
            requested = value,
            actual = ctrl.value,
            "V4L2 control value was clamped"
        );
    }

    Ok(())
}

/// Zoom range of a device node, if it exposes a usable zoom control
pub fn query_zoom_range(device_path: &str) -> Option<ZoomRange> {
    query_control(device_path, V4L2_CID_ZOOM_ABSOLUTE).and_then(|info| info.zoom_range())
}

/// Exposure bias range of a device node, if it exposes the control
pub fn query_exposure_range(device_path: &str) -> Option<ExposureRange> {
    query_control(device_path, V4L2_CID_AUTO_EXPOSURE_BIAS).and_then(|info| info.exposure_range())
}

/// Convert a zoom factor to the raw control value for a given base
pub fn zoom_factor_to_raw(factor: f32, base: f32) -> i32 {
    (factor * base).round() as i32
}

/// Convert an EV bias to the raw control value
pub fn exposure_bias_to_raw(ev: f32) -> i32 {
    (ev * EXPOSURE_BIAS_UNITS_PER_EV).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(min: i32, max: i32, default: i32) -> ControlInfo {
        ControlInfo {
            id: V4L2_CID_ZOOM_ABSOLUTE,
            minimum: min,
            maximum: max,
            step: 1,
            default_value: default,
            flags: 0,
        }
    }

    #[test]
    fn test_control_id_values() {
        assert_eq!(V4L2_CID_ZOOM_ABSOLUTE, 0x009a090d);
        assert_eq!(V4L2_CID_AUTO_EXPOSURE_BIAS, 0x009a0913);
    }

    #[test]
    fn test_zoom_range_relative_to_default() {
        let range = info(100, 400, 100).zoom_range().unwrap();
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 4.0);
        assert_eq!(range.neutral, 1.0);
        assert_eq!(zoom_factor_to_raw(2.5, range.hardware_base.unwrap()), 250);
    }

    #[test]
    fn test_degenerate_controls_are_ignored() {
        assert!(info(100, 100, 100).zoom_range().is_none());
        assert!(info(0, 10, 0).zoom_range().is_none());
        let mut disabled = info(100, 400, 100);
        disabled.flags = V4L2_CTRL_FLAG_DISABLED;
        assert!(disabled.zoom_range().is_none());
    }

    #[test]
    fn test_exposure_range_in_ev() {
        let range = info(-2000, 2000, 0).exposure_range().unwrap();
        assert_eq!(range.min, -2.0);
        assert_eq!(range.max, 2.0);
        assert_eq!(exposure_bias_to_raw(-0.5), -500);
    }
}
