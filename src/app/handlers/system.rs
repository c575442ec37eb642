// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles the settings drawer, configuration updates, external URLs and the
//! system gallery.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::Facing;
use crate::config::{AppTheme, Config};
use crate::gallery;
use crate::permissions::SystemPermissions;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_open_gallery(&self) -> Task<cosmic::Action<Message>> {
        let photos = self.library_folders().photos;
        info!(path = %photos.display(), "Opening gallery");
        gallery::open_system_gallery(&photos);
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let folder_changed = config.effective_folder_name() != self.config.effective_folder_name();
        let mirror_changed = config.mirror_preview != self.config.mirror_preview;
        self.config = config;

        if folder_changed {
            // The media library permission is checked against the save folder
            self.permissions = SystemPermissions::new(self.library_folders().photos);
        }
        if mirror_changed {
            self.sync_device_settings();
        }
        Task::none()
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(
            mirror_preview = self.config.mirror_preview,
            "Mirror preview toggled"
        );
        self.save_config("mirror preview");
        self.sync_device_settings();
        Task::none()
    }

    pub(crate) fn handle_set_preferred_facing(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let facing = match index {
            0 => Facing::Front,
            1 => Facing::Back,
            _ => return Task::none(),
        };

        info!(%facing, "Preferred camera facing changed");
        self.config.preferred_facing = facing;
        self.save_config("preferred facing");
        Task::none()
    }

    pub(crate) fn handle_set_jpeg_quality(&mut self, quality: u8) -> Task<cosmic::Action<Message>> {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self.save_config("JPEG quality");
        Task::none()
    }

    fn save_config(&self, setting: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting, "Failed to save setting");
        }
    }
}
