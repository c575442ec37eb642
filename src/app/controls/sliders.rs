// SPDX-License-Identifier: MPL-2.0

//! Zoom and exposure slider overlays
//!
//! Each overlay edits exactly one capture setting and closes with "Done".

use super::overlay_panel_style;
use crate::app::state::{AppModel, Message};
use crate::constants::{exposure, ui, zoom};
use crate::fl;
use crate::screens::OverlayMode;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

/// Width of the value column to the right of the slider
const VALUE_WIDTH: f32 = 48.0;

impl AppModel {
    /// Build the slider overlay for the open mode, if any
    pub fn build_slider_overlay(&self) -> Option<Element<'_, Message>> {
        match self.capture.overlay() {
            OverlayMode::None => None,
            OverlayMode::Zoom => Some(self.build_zoom_slider()),
            OverlayMode::Exposure => Some(self.build_exposure_slider()),
        }
    }

    fn build_zoom_slider(&self) -> Element<'_, Message> {
        let range = self.capture.zoom_range();
        let level = self.capture.settings().zoom_level;
        let slider = widget::slider(range.min..=range.max, range.clamp(level), Message::SetZoom)
            .step(zoom::STEP);

        Self::build_slider_panel(fl!("capture-zoom"), format!("x{:.1}", level), slider)
    }

    fn build_exposure_slider(&self) -> Element<'_, Message> {
        let range = self.capture.exposure_range();
        let bias = self.capture.settings().exposure_bias;
        // The stored bias may sit outside the device range; only the knob is clamped
        let slider = widget::slider(
            range.min..=range.max,
            bias.clamp(range.min, range.max),
            Message::SetExposureBias,
        )
        .step(exposure::STEP);

        Self::build_slider_panel(fl!("capture-exposure"), format!("{:+.1}", bias), slider)
    }

    fn build_slider_panel<'a>(
        label: String,
        value: String,
        slider: impl Into<Element<'a, Message>>,
    ) -> Element<'a, Message> {
        let spacing = cosmic::theme::spacing();

        let slider_row = widget::row::with_capacity(2)
            .push(slider.into())
            .push(
                widget::text::body(value)
                    .width(Length::Fixed(VALUE_WIDTH))
                    .align_x(Alignment::End),
            )
            .spacing(spacing.space_xs)
            .align_y(Alignment::Center);

        let header = widget::row::with_capacity(3)
            .push(widget::text(label).size(13).font(cosmic::font::bold()))
            .push(widget::horizontal_space())
            .push(
                widget::button::text(fl!("capture-done"))
                    .on_press(Message::CloseOverlay)
                    .class(cosmic::theme::Button::Suggested),
            )
            .align_y(Alignment::Center);

        let panel = widget::container(
            widget::column::with_capacity(2)
                .push(header)
                .push(slider_row)
                .spacing(spacing.space_xs)
                .padding(spacing.space_s),
        )
        .style(overlay_panel_style)
        .width(Length::Fixed(ui::SLIDER_PANEL_WIDTH));

        // Centered above the bottom controls
        widget::container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .align_y(cosmic::iced::alignment::Vertical::Bottom)
            .padding([0, 0, spacing.space_s, 0])
            .into()
    }
}
