// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen handlers
//!
//! Handles camera selection, zoom/exposure forwarding, flash, torch and photo
//! capture.

use crate::app::state::{AppModel, Message, NoticeKind};
use crate::backends::camera::{Applied, CameraBackend, CameraDevice, CameraFrame, Facing};
use crate::constants::timing;
use crate::errors::CaptureError;
use crate::fl;
use crate::navigation::Route;
use crate::photo::{self, PhotoOptions};
use crate::storage::MediaKind;
use cosmic::Task;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    /// Create a delayed task that sends a message after the specified milliseconds
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), "Cameras initialized");
        self.cameras_loaded = true;
        self.capture.set_devices(cameras, self.config.preferred_facing);
        self.sync_device_settings();
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        // Frames still in flight after leaving the screen
        if !self.preview_wanted() {
            return Task::none();
        }
        self.preview_handle = Some(image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        self.current_frame = Some(frame);
        self.preview_error = None;
        Task::none()
    }

    pub(crate) fn handle_preview_failed(&mut self, error: String) -> Task<cosmic::Action<Message>> {
        self.preview_error = Some(error.clone());
        self.current_frame = None;
        self.preview_handle = None;
        self.push_notice(NoticeKind::Error, fl!("preview-failed", error = error))
    }

    pub(crate) fn handle_switch_facing(&mut self) -> Task<cosmic::Action<Message>> {
        let target = self.capture.settings().facing.opposite();
        let torch_was_on = self.capture.settings().torch.is_on();
        if self.capture.select_device(target) {
            // The old frame belongs to the other camera
            self.current_frame = None;
            self.preview_handle = None;
            self.preview_error = None;
            if torch_was_on {
                self.flash_leds.set_all(true);
            }
            self.sync_device_settings();
        }
        Task::none()
    }

    /// Push the current zoom, exposure and mirroring to the device and the preview
    pub(crate) fn sync_device_settings(&self) {
        self.apply_zoom_to_device();
        self.apply_exposure_to_device();
        let mirror =
            self.config.mirror_preview && self.capture.settings().facing == Facing::Front;
        self.adjustments.set_mirror(mirror);
    }

    fn apply_zoom_to_device(&self) {
        let level = self.capture.settings().zoom_level;
        let Some(device) = self.capture.active_device() else {
            self.adjustments.set_digital_zoom(1.0);
            return;
        };
        match self.camera_backend.apply_zoom(device, level) {
            Ok(Applied::Hardware) => self.adjustments.set_digital_zoom(1.0),
            Ok(Applied::Software) => self.adjustments.set_digital_zoom(level),
            Err(e) => {
                warn!(error = %e, level, "Hardware zoom failed, cropping instead");
                self.adjustments.set_digital_zoom(level);
            }
        }
    }

    fn apply_exposure_to_device(&self) {
        let bias = self.capture.settings().exposure_bias;
        let Some(device) = self.capture.active_device() else {
            self.adjustments.set_software_ev(0.0);
            return;
        };
        match self.camera_backend.apply_exposure_bias(device, bias) {
            Ok(Applied::Hardware) => self.adjustments.set_software_ev(0.0),
            Ok(Applied::Software) => self.adjustments.set_software_ev(bias),
            Err(e) => {
                warn!(error = %e, bias, "Exposure control failed, using software gain");
                self.adjustments.set_software_ev(bias);
            }
        }
    }

    pub(crate) fn handle_set_zoom(&mut self, level: f32) -> Task<cosmic::Action<Message>> {
        if let Some(stored) = self.capture.set_zoom(level) {
            debug!(requested = level, stored, "Zoom changed");
            self.apply_zoom_to_device();
        }
        Task::none()
    }

    pub(crate) fn handle_set_exposure_bias(&mut self, value: f32) -> Task<cosmic::Action<Message>> {
        if self.capture.set_exposure_bias(value).is_some() {
            debug!(value, "Exposure bias changed");
            self.apply_exposure_to_device();
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        let flash = self.capture.toggle_flash();
        info!(%flash, hardware = self.flash_leds.is_available(), "Flash toggled");
        Task::none()
    }

    pub(crate) fn handle_toggle_torch(&mut self) -> Task<cosmic::Action<Message>> {
        let torch = self.capture.toggle_torch();
        if self.flash_leds.is_available() {
            self.flash_leds.set_all(torch.is_on());
        } else {
            info!(%torch, "No torch LED available, torch has no effect");
        }
        Task::none()
    }

    /// Shutter pressed
    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let generation = match self.capture.begin_capture() {
            Ok(generation) => generation,
            Err(CaptureError::Busy) => {
                debug!("Capture already in progress, ignoring shutter");
                return Task::none();
            }
            Err(e) => {
                warn!(error = %e, "Cannot capture");
                return self.push_notice(
                    NoticeKind::Error,
                    fl!("capture-failed", error = e.to_string()),
                );
            }
        };

        if self.capture.settings().flash.is_on() {
            info!(
                hardware = self.flash_leds.is_available(),
                "Flash enabled - showing flash before capture"
            );
            if self.flash_leds.is_available() {
                self.flash_leds.set_all(true);
            }
            self.flash_active = true;
            return Self::delay_task(
                timing::FLASH_DURATION.as_millis() as u64,
                Message::FlashComplete,
            );
        }

        self.take_photo(generation)
    }

    pub(crate) fn handle_flash_complete(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.flash_active {
            return Task::none();
        }
        let task = self.take_photo(self.capture.generation());
        self.flash_active = false;
        if self.flash_leds.is_available() && !self.capture.settings().torch.is_on() {
            self.flash_leds.set_all(false);
        }
        task
    }

    /// Encode the latest frame into the capture directory
    fn take_photo(&mut self, generation: u64) -> Task<cosmic::Action<Message>> {
        let Some(frame) = self.current_frame.clone() else {
            self.capture.finish_capture(generation);
            info!("No frame available to capture");
            return self.push_notice(
                NoticeKind::Error,
                fl!("capture-failed", error = CaptureError::NotReady.to_string()),
            );
        };

        let options = PhotoOptions {
            jpeg_quality: self.config.effective_jpeg_quality(),
            unmirror: self.adjustments.snapshot().mirror,
        };
        let dir = self.capture_dir.clone();
        info!(width = frame.width, height = frame.height, "Capturing photo...");

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || photo::write_photo(&frame, &dir, options))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|result| result.map_err(|e| e.to_string()))
            },
            move |result| cosmic::Action::App(Message::PhotoCaptured(generation, result)),
        )
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        generation: u64,
        result: Result<PathBuf, String>,
    ) -> Task<cosmic::Action<Message>> {
        if !self.capture.finish_capture(generation) {
            // Capture screen was remounted while encoding; drop the old frame
            return self.remove_capture_task(result.ok());
        }
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Photo captured");
                if *self.router.current() != Route::Capture {
                    debug!("Capture screen left while encoding, not opening review");
                    return self.remove_capture_task(Some(path));
                }
                self.router.push(Route::media(
                    path.display().to_string(),
                    MediaKind::Photo.as_str(),
                ));
                self.route_changed()
            }
            Err(err) => {
                error!(error = %err, "Failed to capture photo");
                self.push_notice(NoticeKind::Error, fl!("capture-failed", error = err))
            }
        }
    }
}
