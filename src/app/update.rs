// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handlers live in
//! the `handlers` submodules, grouped by screen.
//!
//! # Handler Modules
//!
//! - `handlers::navigation`: routes, screen mounting, notices, dialog
//! - `handlers::permissions`: permission gate
//! - `handlers::capture`: camera selection, settings, flash, photo capture
//! - `handlers::review`: save and discard
//! - `handlers::system`: gallery, settings drawer, configuration

use crate::app::state::{AppModel, Message};
use cosmic::Task;
use tracing::{debug, info};

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::Navigate(route) => self.handle_navigate(route),
            Message::Back => self.handle_back(),
            Message::DismissNotice(id) => {
                self.notices.dismiss(id);
                Task::none()
            }
            Message::CloseDialog => {
                self.dialog = None;
                Task::none()
            }

            // ===== Permissions =====
            Message::PermissionsQueried(state) => self.handle_permissions_queried(state),
            Message::RequestPermission(kind) => self.handle_request_permission(kind),
            Message::PermissionAnswered(kind, status) => {
                self.handle_permission_answered(kind, status)
            }
            Message::ContinueFromPermissions => self.handle_continue_from_permissions(),
            Message::OpenPermissions => self.handle_open_permissions(),

            // ===== Camera =====
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),
            Message::PreviewFailed(error) => self.handle_preview_failed(error),
            Message::SwitchFacing => self.handle_switch_facing(),
            Message::SetZoom(level) => self.handle_set_zoom(level),
            Message::SetExposureBias(value) => self.handle_set_exposure_bias(value),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleTorch => self.handle_toggle_torch(),
            Message::ToggleOverlay(mode) => {
                self.capture.toggle_overlay(mode);
                Task::none()
            }
            Message::CloseOverlay => {
                self.capture.close_overlay();
                Task::none()
            }

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::FlashComplete => self.handle_flash_complete(),
            Message::PhotoCaptured(generation, result) => {
                self.handle_photo_captured(generation, result)
            }
            Message::OpenGallery => self.handle_open_gallery(),

            // ===== Review =====
            Message::SaveToLibrary => self.handle_save_to_library(),
            Message::SaveFinished(result) => self.handle_save_finished(result),
            Message::DiscardAndBack => self.handle_discard_and_back(),
            Message::OpenVideo => self.handle_open_video(),
            Message::CaptureRemoved(result) => {
                debug!(?result, "Temporary capture cleanup finished");
                Task::none()
            }
            Message::StaleCapturesPurged(removed) => {
                if removed > 0 {
                    info!(removed, "Stale captures purged");
                }
                Task::none()
            }

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::SetPreferredFacing(index) => self.handle_set_preferred_facing(index),
            Message::SetJpegQuality(quality) => self.handle_set_jpeg_quality(quality),
        }
    }
}
