// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application ID used for config, cache directories and D-Bus
pub const APP_ID: &str = "io.github.visioncam.VisionCam";

/// UI Constants
pub mod ui {
    /// Capture button size (outer)
    pub const CAPTURE_BUTTON_OUTER: f32 = 72.0;

    /// Capture button size (inner)
    pub const CAPTURE_BUTTON_INNER: f32 = 58.0;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    ///
    /// Used for semi-transparent backgrounds on buttons and panels overlaid on the camera preview.
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Overlay panel border radius
    pub const PANEL_BORDER_RADIUS: f32 = 8.0;

    /// Width of the zoom/exposure slider panel
    pub const SLIDER_PANEL_WIDTH: f32 = 320.0;

    /// Standard icon button width (for layout balancing)
    pub const ICON_BUTTON_WIDTH: f32 = 44.0;

    /// Label text size in the info panel
    pub const INFO_TEXT_SIZE: u16 = 12;

    /// Maximum width of the permission gate column
    pub const PERMISSION_COLUMN_WIDTH: f32 = 480.0;
}

/// Zoom defaults for devices that do not report a hardware zoom control
pub mod zoom {
    /// Neutral (un-zoomed) factor
    pub const NEUTRAL: f32 = 1.0;

    /// Minimum digital zoom factor
    pub const DIGITAL_MIN: f32 = 1.0;

    /// Maximum digital zoom factor
    pub const DIGITAL_MAX: f32 = 4.0;

    /// Slider step
    pub const STEP: f32 = 0.1;
}

/// Exposure bias defaults, in EV
pub mod exposure {
    /// Slider range used when the device does not report one
    pub const FALLBACK_MIN_EV: f32 = -2.0;

    /// Slider range used when the device does not report one
    pub const FALLBACK_MAX_EV: f32 = 2.0;

    /// Slider step
    pub const STEP: f32 = 0.1;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Capacity of the frame channel between GStreamer and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 2;

    /// PipeWire media class of cameras
    pub const VIDEO_SOURCE_CLASS: &str = "Video/Source";

    /// PipeWire media class of microphones
    pub const AUDIO_SOURCE_CLASS: &str = "Audio/Source";
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// How long the flash (LED or screen) stays on before the frame is taken
    pub const FLASH_DURATION: Duration = Duration::from_millis(600);

    /// How long a toast notice stays on screen
    pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 120;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Captures older than this are purged from the capture directory at startup
    pub const STALE_CAPTURE_AGE: Duration = Duration::from_secs(60 * 60);
}

/// Capture and library file naming
pub mod files {
    /// Subdirectory of the cache directory holding unsaved captures
    pub const CAPTURE_DIR_NAME: &str = "captures";

    /// Prefix of captured photo file names
    pub const PHOTO_PREFIX: &str = "IMG";

    /// Prefix of captured video file names
    pub const VIDEO_PREFIX: &str = "VID";

    /// Timestamp format used in file names
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.3f";

    /// Probe file used to check that the library folder is writable
    pub const PROBE_FILE_NAME: &str = ".visioncam-write-test";
}

/// Gallery URIs opened by the gallery button
pub mod gallery {
    /// iOS Photos app
    pub const IOS_URI: &str = "photos-redirect://";

    /// Android media store images collection
    pub const ANDROID_URI: &str = "content://media/external/images/media";
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }

    /// Get the runtime environment string (e.g., "Flatpak" or "Native")
    pub fn runtime_environment() -> &'static str {
        if is_flatpak() { "Flatpak" } else { "Native" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital_zoom_range_contains_neutral() {
        assert!(zoom::DIGITAL_MIN <= zoom::NEUTRAL);
        assert!(zoom::NEUTRAL <= zoom::DIGITAL_MAX);
    }

    #[test]
    fn test_fallback_exposure_range_is_symmetric() {
        assert_eq!(exposure::FALLBACK_MIN_EV, -exposure::FALLBACK_MAX_EV);
    }
}
