// SPDX-License-Identifier: GPL-3.0-only

//! Flash LED control via Linux sysfs
//!
//! LEDs exposed at `/sys/class/leds/*:flash` (and `*:torch`) are driven through
//! their `brightness` file, which is group-writable on most phones running
//! `feedbackd`. Torch keeps the LED lit; flash lights it for a single capture.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const LEDS_ROOT: &str = "/sys/class/leds";

/// A writable LED discovered under the sysfs LED class
#[derive(Debug, Clone)]
pub struct FlashLed {
    path: PathBuf,
    max_brightness: u32,
    name: String,
}

impl FlashLed {
    /// Name of the sysfs entry, e.g. `white:flash`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        std::fs::write(
            self.path.join("brightness"),
            value.min(self.max_brightness).to_string(),
        )
    }

    /// Full brightness
    pub fn on(&self) -> io::Result<()> {
        self.set_brightness(self.max_brightness)
    }

    /// Turn off the LED
    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }
}

/// All controllable flash LEDs of the machine
///
/// Laptops and desktops usually have none; the capture screen then falls back
/// to a white screen flash and hides the torch hardware path.
#[derive(Debug, Clone, Default)]
pub struct FlashLeds {
    leds: Vec<FlashLed>,
    /// Set when LEDs exist but none of them is writable
    pub permission_denied: bool,
}

impl FlashLeds {
    /// Scan the system LED class
    pub fn discover() -> Self {
        Self::discover_in(Path::new(LEDS_ROOT))
    }

    /// Scan a sysfs-like LED directory
    pub fn discover_in(root: &Path) -> Self {
        let Ok(entries) = std::fs::read_dir(root) else {
            warn!(root = %root.display(), "Cannot read LED class, flash discovery skipped");
            return Self::default();
        };

        let mut leds = Vec::new();
        let mut unwritable = 0usize;

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name_str) = name.to_str() else {
                continue;
            };
            if !name_str.ends_with(":flash") && !name_str.ends_with(":torch") {
                continue;
            }

            let led_path = entry.path();
            let max_brightness_path = led_path.join("max_brightness");
            let max_brightness = match std::fs::read_to_string(&max_brightness_path)
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
            {
                Some(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_brightness_path.display(), "Invalid max_brightness value");
                    continue;
                }
            };

            let brightness_path = led_path.join("brightness");
            if let Err(e) = std::fs::OpenOptions::new()
                .write(true)
                .open(&brightness_path)
            {
                warn!(
                    path = %brightness_path.display(),
                    error = %e,
                    "Flash LED found but not writable"
                );
                unwritable += 1;
                continue;
            }

            info!(name = name_str, max_brightness, "Discovered flash LED");
            leds.push(FlashLed {
                path: led_path,
                max_brightness,
                name: name_str.to_string(),
            });
        }

        leds.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            permission_denied: leds.is_empty() && unwritable > 0,
            leds,
        }
    }

    /// Whether any controllable LED was found
    pub fn is_available(&self) -> bool {
        !self.leds.is_empty()
    }

    pub fn leds(&self) -> &[FlashLed] {
        &self.leds
    }

    /// Turn every LED on or off, logging individual failures
    pub fn set_all(&self, on: bool) {
        for led in &self.leds {
            let result = if on { led.on() } else { led.off() };
            if let Err(e) = result {
                warn!(led = %led.name, on, error = %e, "Failed to drive flash LED");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_led(root: &Path, name: &str, max: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("max_brightness"), max).unwrap();
        std::fs::write(dir.join("brightness"), "0").unwrap();
        dir
    }

    #[test]
    fn test_discovers_only_flash_and_torch_entries() {
        let root = tempfile::tempdir().unwrap();
        fake_led(root.path(), "white:flash", "255\n");
        fake_led(root.path(), "yellow:torch", "15");
        fake_led(root.path(), "input3::capslock", "1");

        let leds = FlashLeds::discover_in(root.path());
        let names: Vec<_> = leds.leds().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["white:flash", "yellow:torch"]);
        assert!(!leds.permission_denied);
    }

    #[test]
    fn test_set_all_writes_max_and_zero() {
        let root = tempfile::tempdir().unwrap();
        let dir = fake_led(root.path(), "white:flash", "200");
        let leds = FlashLeds::discover_in(root.path());

        leds.set_all(true);
        assert_eq!(std::fs::read_to_string(dir.join("brightness")).unwrap(), "200");
        leds.set_all(false);
        assert_eq!(std::fs::read_to_string(dir.join("brightness")).unwrap(), "0");
    }

    #[test]
    fn test_missing_root_yields_no_leds() {
        let leds = FlashLeds::discover_in(Path::new("/nonexistent/leds"));
        assert!(!leds.is_available());
    }

    #[test]
    fn test_zero_max_brightness_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        fake_led(root.path(), "white:flash", "0");
        assert!(!FlashLeds::discover_in(root.path()).is_available());
    }
}
