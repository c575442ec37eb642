// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen view
//!
//! Live preview with the settings row on top, the info panel, the slider
//! overlay and the shutter row at the bottom.

use crate::app::controls::overlay_panel_style;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::screens::OverlayMode;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon, tooltip};

/// Icon toggle with a tooltip, highlighted while active
fn toggle_button<'a>(
    icon_name: &'static str,
    label: String,
    active: bool,
    message: Option<Message>,
) -> Element<'a, Message> {
    let button = widget::button::icon(icon::from_name(icon_name))
        .on_press_maybe(message)
        .class(if active {
            cosmic::theme::Button::Suggested
        } else {
            cosmic::theme::Button::Standard
        });

    widget::tooltip(button, widget::text(label), tooltip::Position::Bottom).into()
}

impl AppModel {
    pub fn build_capture_view(&self) -> Element<'_, Message> {
        let mut preview_stack = cosmic::iced::widget::stack![self.build_preview()]
            .width(Length::Fill)
            .height(Length::Fill);

        preview_stack = preview_stack.push(
            widget::container(
                widget::column::with_capacity(2)
                    .push(self.build_capture_top_bar())
                    .push(self.build_info_panel())
                    .spacing(cosmic::theme::spacing().space_xxs),
            )
            .width(Length::Fill)
            .align_y(cosmic::iced::alignment::Vertical::Top),
        );

        if let Some(overlay) = self.build_slider_overlay() {
            preview_stack = preview_stack.push(overlay);
        }

        widget::column::with_capacity(2)
            .push(preview_stack)
            .push(self.build_shutter_row())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Latest frame, or a placeholder while starting or without a camera
    fn build_preview(&self) -> Element<'_, Message> {
        if let Some(handle) = &self.preview_handle {
            return widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let placeholder = if self.cameras_loaded && self.capture.active_device().is_none() {
            fl!("capture-no-camera")
        } else if let Some(error) = &self.preview_error {
            fl!("preview-failed", error = error.clone())
        } else {
            fl!("capture-starting")
        };

        widget::container(
            widget::text(placeholder).class(cosmic::theme::style::Text::Color(Color::WHITE)),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    /// Flash, torch, zoom and exposure toggles plus the permissions button
    fn build_capture_top_bar(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let settings = self.capture.settings();
        let has_device = self.capture.active_device().is_some();
        let overlay = self.capture.overlay();

        widget::row()
            .push(toggle_button(
                "camera-flash-symbolic",
                fl!("capture-flash"),
                settings.flash.is_on(),
                Some(Message::ToggleFlash),
            ))
            .push(toggle_button(
                "display-brightness-symbolic",
                fl!("capture-torch"),
                settings.torch.is_on(),
                Some(Message::ToggleTorch),
            ))
            .push(toggle_button(
                "zoom-in-symbolic",
                fl!("capture-zoom"),
                overlay == OverlayMode::Zoom,
                has_device.then_some(Message::ToggleOverlay(OverlayMode::Zoom)),
            ))
            .push(toggle_button(
                "weather-clear-symbolic",
                fl!("capture-exposure"),
                overlay == OverlayMode::Exposure,
                has_device.then_some(Message::ToggleOverlay(OverlayMode::Exposure)),
            ))
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(toggle_button(
                "preferences-system-privacy-symbolic",
                fl!("capture-permissions"),
                false,
                Some(Message::OpenPermissions),
            ))
            .spacing(spacing.space_xxs)
            .padding(spacing.space_xs)
            .align_y(Alignment::Center)
            .into()
    }

    /// Active format, device name and the exposure/zoom status line
    fn build_info_panel(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let Some(device) = self.capture.active_device() else {
            return widget::Space::new(Length::Shrink, Length::Shrink).into();
        };

        let mut column = widget::column().spacing(2);
        if let Some(format) = device.primary_format() {
            column = column.push(
                widget::text(format!(
                    "{} · {}",
                    fl!("capture-info-fps", fps = format.max_fps),
                    fl!(
                        "capture-info-size",
                        width = format.photo_width,
                        height = format.photo_height
                    )
                ))
                .size(ui::INFO_TEXT_SIZE),
            );
        }
        column = column
            .push(widget::text(device.name.as_str()).size(ui::INFO_TEXT_SIZE))
            .push(widget::text(self.capture.status_line()).size(ui::INFO_TEXT_SIZE));

        let panel = widget::container(column)
            .padding(spacing.space_xxs)
            .style(overlay_panel_style);

        widget::container(panel)
            .padding([0, spacing.space_xs])
            .into()
    }

    /// Gallery, shutter and facing switch
    fn build_shutter_row(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let gallery = widget::container(widget::tooltip(
            widget::button::icon(icon::from_name("folder-pictures-symbolic"))
                .on_press(Message::OpenGallery),
            widget::text(fl!("capture-gallery")),
            tooltip::Position::Top,
        ))
        .width(Length::Fixed(ui::ICON_BUTTON_WIDTH))
        .center_x(Length::Fixed(ui::ICON_BUTTON_WIDTH));

        let switch = widget::container(widget::tooltip(
            widget::button::icon(icon::from_name("camera-switch-symbolic"))
                .on_press_maybe(
                    (self.capture.can_switch_facing() && !self.capture.is_capturing())
                        .then_some(Message::SwitchFacing),
                ),
            widget::text(fl!("capture-switch-camera")),
            tooltip::Position::Top,
        ))
        .width(Length::Fixed(ui::ICON_BUTTON_WIDTH))
        .center_x(Length::Fixed(ui::ICON_BUTTON_WIDTH));

        widget::container(
            widget::row::with_capacity(5)
                .push(gallery)
                .push(widget::Space::new(Length::Fill, Length::Shrink))
                .push(self.build_capture_button())
                .push(widget::Space::new(Length::Fill, Length::Shrink))
                .push(switch)
                .align_y(Alignment::Center)
                .padding([0, spacing.space_m]),
        )
        .width(Length::Fill)
        .style(|_theme| widget::container::Style {
            background: Some(Background::Color(Color::BLACK)),
            ..Default::default()
        })
        .into()
    }
}
