// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen controller
//!
//! Holds the device list, the transient capture settings and the overlay
//! state. Settings are never persisted: [`CaptureScreen::remount`] puts them
//! back to the defaults of the active device.

use crate::backends::camera::{CameraDevice, ExposureRange, Facing, ZoomRange, first_with_facing};
use crate::errors::CaptureError;
use std::fmt;
use tracing::{debug, info, warn};

/// Binary flash/torch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Switch {
    #[default]
    Off,
    On,
}

impl Switch {
    pub fn toggled(self) -> Self {
        match self {
            Switch::Off => Switch::On,
            Switch::On => Switch::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Switch::Off => write!(f, "off"),
            Switch::On => write!(f, "on"),
        }
    }
}

/// Settings the user changes on the capture screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub facing: Facing,
    pub zoom_level: f32,
    pub exposure_bias: f32,
    pub flash: Switch,
    pub torch: Switch,
}

impl CaptureSettings {
    /// Defaults for a facing and (optionally) its device
    pub fn defaults(facing: Facing, device: Option<&CameraDevice>) -> Self {
        Self {
            facing,
            zoom_level: device.map(|d| d.zoom).unwrap_or_default().neutral,
            exposure_bias: 0.0,
            flash: Switch::Off,
            torch: Switch::Off,
        }
    }
}

/// Which slider overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    #[default]
    None,
    Zoom,
    Exposure,
}

#[derive(Debug, Clone)]
pub struct CaptureScreen {
    devices: Vec<CameraDevice>,
    active: Option<usize>,
    settings: CaptureSettings,
    overlay: OverlayMode,
    capturing: bool,
    /// Bumped on every remount; encodes started before it are stale
    generation: u64,
}

impl CaptureScreen {
    pub fn new(preferred: Facing) -> Self {
        Self {
            devices: Vec::new(),
            active: None,
            settings: CaptureSettings::defaults(preferred, None),
            overlay: OverlayMode::None,
            capturing: false,
            generation: 0,
        }
    }

    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    pub fn active_device(&self) -> Option<&CameraDevice> {
        self.active.and_then(|i| self.devices.get(i))
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn overlay(&self) -> OverlayMode {
        self.overlay
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether some device faces the other way
    pub fn can_switch_facing(&self) -> bool {
        first_with_facing(&self.devices, self.settings.facing.opposite()).is_some()
    }

    /// Replace the device list
    ///
    /// The preferred facing wins when present; otherwise the first device is
    /// used whatever its facing.
    pub fn set_devices(&mut self, devices: Vec<CameraDevice>, preferred: Facing) {
        let previous = self.active_device().map(CameraDevice::id);
        self.devices = devices;
        self.active = self
            .devices
            .iter()
            .position(|d| d.facing == preferred)
            .or_else(|| (!self.devices.is_empty()).then_some(0));

        let facing = self.active_device().map(|d| d.facing).unwrap_or(preferred);
        if previous != self.active_device().map(CameraDevice::id) {
            self.settings = CaptureSettings::defaults(facing, self.active_device());
        }
        info!(
            count = self.devices.len(),
            active = ?self.active_device().map(|d| d.name.as_str()),
            "Camera list updated"
        );
    }

    /// Back to default settings, as when the screen is shown again
    pub fn remount(&mut self) {
        self.settings = CaptureSettings::defaults(self.settings.facing, self.active_device());
        self.overlay = OverlayMode::None;
        self.capturing = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Make the first device with `facing` active
    ///
    /// Returns false, changing nothing, when no device has that facing.
    pub fn select_device(&mut self, facing: Facing) -> bool {
        let Some(index) = self.devices.iter().position(|d| d.facing == facing) else {
            warn!(%facing, "No camera with this facing, keeping current device");
            return false;
        };
        self.active = Some(index);
        self.settings.facing = facing;
        self.settings.zoom_level = self.devices[index].zoom.neutral;
        info!(%facing, name = %self.devices[index].name, "Camera selected");
        true
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.active_device().map(|d| d.zoom).unwrap_or_default()
    }

    pub fn exposure_range(&self) -> ExposureRange {
        self.active_device()
            .map(CameraDevice::exposure_range)
            .unwrap_or_else(ExposureRange::fallback)
    }

    /// Clamp and store a zoom level, returning the stored value
    pub fn set_zoom(&mut self, level: f32) -> Option<f32> {
        if !level.is_finite() {
            debug!(level, "Ignoring non-finite zoom");
            return None;
        }
        let clamped = self.zoom_range().clamp(level);
        self.settings.zoom_level = clamped;
        Some(clamped)
    }

    /// Store an exposure bias; the value reaches the device unmodified
    pub fn set_exposure_bias(&mut self, value: f32) -> Option<f32> {
        if !value.is_finite() {
            debug!(value, "Ignoring non-finite exposure bias");
            return None;
        }
        self.settings.exposure_bias = value;
        Some(value)
    }

    pub fn toggle_flash(&mut self) -> Switch {
        self.settings.flash = self.settings.flash.toggled();
        self.settings.flash
    }

    pub fn toggle_torch(&mut self) -> Switch {
        self.settings.torch = self.settings.torch.toggled();
        self.settings.torch
    }

    /// Open `mode`, or close it when it is already open
    pub fn toggle_overlay(&mut self, mode: OverlayMode) {
        self.overlay = if self.overlay == mode {
            OverlayMode::None
        } else {
            mode
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = OverlayMode::None;
    }

    /// Take the shutter; fails while a capture is pending or without a device
    ///
    /// Returns the generation to hand back to [`CaptureScreen::finish_capture`].
    pub fn begin_capture(&mut self) -> Result<u64, CaptureError> {
        if self.capturing {
            return Err(CaptureError::Busy);
        }
        if self.active_device().is_none() {
            return Err(CaptureError::NoDevice);
        }
        self.capturing = true;
        Ok(self.generation)
    }

    /// Release the shutter; false when the capture predates a remount
    pub fn finish_capture(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Ignoring stale capture");
            return false;
        }
        self.capturing = false;
        true
    }

    /// `Exposure: <bias> | Zoom: x<zoom>`
    pub fn status_line(&self) -> String {
        format!(
            "Exposure: {:.1} | Zoom: x{:.1}",
            self.settings.exposure_bias, self.settings.zoom_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::test_support::device;

    fn screen() -> CaptureScreen {
        let mut screen = CaptureScreen::new(Facing::Back);
        screen.set_devices(
            vec![device("video0", Facing::Back), device("video2", Facing::Front)],
            Facing::Back,
        );
        screen
    }

    #[test]
    fn test_preferred_facing_is_selected() {
        let mut screen = CaptureScreen::new(Facing::Front);
        screen.set_devices(
            vec![device("video0", Facing::Back), device("video2", Facing::Front)],
            Facing::Front,
        );
        assert_eq!(screen.active_device().unwrap().name, "video2");
        assert_eq!(screen.settings().facing, Facing::Front);
    }

    #[test]
    fn test_missing_facing_falls_back_to_first_device() {
        let mut screen = CaptureScreen::new(Facing::Front);
        screen.set_devices(vec![device("video0", Facing::Back)], Facing::Front);
        assert_eq!(screen.active_device().unwrap().name, "video0");
        assert_eq!(screen.settings().facing, Facing::Back);
        assert!(!screen.can_switch_facing());
    }

    #[test]
    fn test_select_missing_facing_keeps_device() {
        let mut screen = CaptureScreen::new(Facing::Back);
        screen.set_devices(vec![device("video0", Facing::Back)], Facing::Back);
        screen.set_zoom(2.0);

        assert!(!screen.select_device(Facing::Front));
        assert_eq!(screen.active_device().unwrap().name, "video0");
        assert_eq!(screen.settings().facing, Facing::Back);
        assert_eq!(screen.settings().zoom_level, 2.0);
    }

    #[test]
    fn test_switching_resets_zoom_only() {
        let mut screen = screen();
        screen.set_zoom(3.0);
        screen.set_exposure_bias(1.5);
        screen.toggle_torch();

        assert!(screen.select_device(Facing::Front));
        let settings = screen.settings();
        assert_eq!(settings.zoom_level, 1.0);
        assert_eq!(settings.exposure_bias, 1.5);
        assert!(settings.torch.is_on());
    }

    #[test]
    fn test_zoom_is_always_in_range() {
        let mut screen = screen();
        let range = screen.zoom_range();
        for level in [-10.0, 0.0, 0.5, 1.0, 2.5, 4.0, 9.0, f32::MAX] {
            let stored = screen.set_zoom(level).unwrap();
            assert!(stored >= range.min && stored <= range.max, "{level} -> {stored}");
        }
        assert_eq!(screen.set_zoom(f32::NAN), None);
        assert_eq!(screen.set_zoom(f32::INFINITY), None);
        assert_eq!(screen.settings().zoom_level, range.max);
    }

    #[test]
    fn test_exposure_is_stored_unmodified() {
        let mut screen = screen();
        assert_eq!(screen.set_exposure_bias(7.25), Some(7.25));
        assert_eq!(screen.settings().exposure_bias, 7.25);
    }

    #[test]
    fn test_flash_and_torch_are_independent() {
        let mut screen = screen();
        let before = *screen.settings();

        screen.toggle_flash();
        assert!(screen.settings().flash.is_on());
        assert_eq!(screen.settings().torch, before.torch);

        screen.toggle_torch();
        screen.toggle_torch();
        assert_eq!(screen.settings().torch, before.torch);

        screen.toggle_flash();
        assert_eq!(*screen.settings(), before);
    }

    #[test]
    fn test_overlays_are_exclusive() {
        let mut screen = screen();
        screen.toggle_overlay(OverlayMode::Zoom);
        assert_eq!(screen.overlay(), OverlayMode::Zoom);
        screen.toggle_overlay(OverlayMode::Exposure);
        assert_eq!(screen.overlay(), OverlayMode::Exposure);
        screen.toggle_overlay(OverlayMode::Exposure);
        assert_eq!(screen.overlay(), OverlayMode::None);

        screen.toggle_overlay(OverlayMode::Zoom);
        screen.close_overlay();
        assert_eq!(screen.overlay(), OverlayMode::None);
    }

    #[test]
    fn test_capture_guard() {
        let mut screen = screen();
        let generation = screen.begin_capture().unwrap();
        assert_eq!(screen.begin_capture(), Err(CaptureError::Busy));
        assert!(screen.finish_capture(generation));
        assert!(screen.begin_capture().is_ok());

        let mut empty = CaptureScreen::new(Facing::Back);
        assert_eq!(empty.begin_capture(), Err(CaptureError::NoDevice));
    }

    #[test]
    fn test_remount_restores_defaults() {
        let mut screen = screen();
        screen.set_zoom(2.0);
        screen.set_exposure_bias(-1.0);
        screen.toggle_flash();
        screen.toggle_overlay(OverlayMode::Zoom);

        screen.remount();
        assert_eq!(
            *screen.settings(),
            CaptureSettings::defaults(Facing::Back, screen.active_device())
        );
        assert_eq!(screen.overlay(), OverlayMode::None);
    }

    #[test]
    fn test_capture_from_before_remount_is_stale() {
        let mut screen = screen();
        let old = screen.begin_capture().unwrap();
        screen.remount();
        assert!(!screen.is_capturing());

        let current = screen.begin_capture().unwrap();
        assert_ne!(old, current);
        assert!(!screen.finish_capture(old));
        assert!(screen.is_capturing());
        assert_eq!(screen.begin_capture(), Err(CaptureError::Busy));

        assert!(screen.finish_capture(current));
        assert!(!screen.is_capturing());
    }

    #[test]
    fn test_status_line() {
        let mut screen = screen();
        screen.set_zoom(2.0);
        screen.set_exposure_bias(-0.5);
        assert_eq!(screen.status_line(), "Exposure: -0.5 | Zoom: x2.0");
    }
}
