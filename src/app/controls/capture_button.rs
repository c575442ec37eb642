// SPDX-License-Identifier: MPL-2.0

//! Capture button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the shutter button
    ///
    /// - White circle when ready
    /// - Gray and slightly smaller while a capture is in flight
    /// - Grayed out and non-interactive without an active camera
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let is_disabled = self.capture.active_device().is_none();
        let is_capturing = self.capture.is_capturing();

        let color = if is_disabled {
            Color::from_rgba(0.5, 0.5, 0.5, 0.3)
        } else if is_capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        // Press down effect while the photo is encoded
        let scale = if is_capturing { 0.85 } else { 1.0 };
        let inner_size = ui::CAPTURE_BUTTON_INNER * scale;
        let outer_size = ui::CAPTURE_BUTTON_OUTER * scale;

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [inner_size / 2.0; 4].into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let mut button = widget::button::custom(button_inner)
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));
        if !is_disabled && !is_capturing {
            button = button.on_press(Message::Capture);
        }

        // Fixed-size wrapper so the press effect does not shift the layout
        let button_wrapper = widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER);

        widget::container(button_wrapper)
            .padding([spacing.space_xs, 0])
            .into()
    }
}
