// SPDX-License-Identifier: MPL-2.0

//! Capture controls module
//!
//! - Capture button
//! - Zoom and exposure slider overlays

pub mod capture_button;
pub mod sliders;

use crate::constants::ui::{OVERLAY_BACKGROUND_ALPHA, PANEL_BORDER_RADIUS};
use cosmic::iced::{Background, Color};
use cosmic::widget;

/// Semi-transparent themed background for panels drawn over the preview
pub fn overlay_panel_style(theme: &cosmic::Theme) -> widget::container::Style {
    let bg = theme.cosmic().bg_color();
    widget::container::Style {
        background: Some(Background::Color(Color::from_rgba(
            bg.red,
            bg.green,
            bg.blue,
            OVERLAY_BACKGROUND_ALPHA,
        ))),
        border: cosmic::iced::Border {
            radius: PANEL_BORDER_RADIUS.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
