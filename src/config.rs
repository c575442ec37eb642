// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::Facing;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

/// User preferences
///
/// Capture settings (zoom, exposure, flash, torch) are deliberately absent:
/// they reset whenever the capture screen is mounted.
#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Folder name under Pictures/ and Videos/ that saved media goes into
    pub save_folder_name: String,
    /// Mirror camera preview horizontally when the front camera is active
    pub mirror_preview: bool,
    /// Facing selected when the capture screen is mounted
    pub preferred_facing: Facing,
    /// JPEG quality (1-100) for captured photos
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            save_folder_name: "VisionCam".to_string(),
            mirror_preview: true,
            preferred_facing: Facing::Back,
            jpeg_quality: 92,
        }
    }
}

impl Config {
    /// JPEG quality clamped to the range the encoder accepts
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }

    /// Folder name with path separators stripped, falling back to the default
    pub fn effective_folder_name(&self) -> String {
        let cleaned: String = self
            .save_folder_name
            .chars()
            .filter(|c| *c != '/' && *c != '\\')
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
            Self::default().save_folder_name
        } else {
            cleaned.to_string()
        }
    }
}
