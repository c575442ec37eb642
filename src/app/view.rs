// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Picks the screen for the current route and layers the transient UI on
//! top of it:
//! - Screen flash while a flash capture is pending (no LED)
//! - Notices (toasts)
//! - Blocking dialog

use crate::app::controls::overlay_panel_style;
use crate::app::state::{AppDialog, AppModel, Message, NoticeKind};
use crate::fl;
use crate::navigation::Route;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        // Screen flash: only the white overlay, no controls
        if self.flash_active && !self.flash_leds.is_available() {
            return widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::WHITE)),
                    ..Default::default()
                })
                .into();
        }

        let screen = match self.router.current() {
            Route::Capture if self.capture_allowed() => self.build_capture_view(),
            Route::Capture => Self::build_checking_permissions(),
            Route::Permissions => self.build_permissions_view(),
            Route::Media { .. } => self.build_review_view(),
        };

        let mut stack = cosmic::iced::widget::stack![screen]
            .width(Length::Fill)
            .height(Length::Fill);

        if let Some(notices) = self.build_notices() {
            stack = stack.push(notices);
        }
        if let Some(dialog) = self.build_dialog() {
            stack = stack.push(dialog);
        }

        let black_background = matches!(self.router.current(), Route::Capture);
        widget::container(stack)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| widget::container::Style {
                background: black_background.then_some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }

    /// Shown on the capture route until the permission query has answered
    fn build_checking_permissions() -> Element<'static, Message> {
        widget::container(widget::text::body(fl!("permissions-checking")))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Toasts stacked at the bottom center, oldest on top
    fn build_notices(&self) -> Option<Element<'_, Message>> {
        let items = self.notices.items();
        if items.is_empty() {
            return None;
        }
        let spacing = cosmic::theme::spacing();

        let mut column = widget::column().spacing(spacing.space_xxs).align_x(Alignment::Center);
        for notice in items {
            let text = widget::text::body(notice.text.as_str());
            let text = match notice.kind {
                NoticeKind::Info => text,
                NoticeKind::Error => text.class(cosmic::theme::Text::Color(Color::from_rgb(
                    1.0, 0.45, 0.45,
                ))),
            };
            let dismiss = widget::button::icon(widget::icon::from_name("window-close-symbolic"))
                .on_press(Message::DismissNotice(notice.id))
                .class(cosmic::theme::Button::Text)
                .padding(2);

            column = column.push(
                widget::container(
                    widget::row::with_capacity(2)
                        .push(text)
                        .push(dismiss)
                        .spacing(spacing.space_xs)
                        .align_y(Alignment::Center),
                )
                .padding([spacing.space_xxs, spacing.space_s])
                .style(overlay_panel_style),
            );
        }

        Some(
            widget::container(column)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(cosmic::iced::alignment::Horizontal::Center)
                .align_y(cosmic::iced::alignment::Vertical::Bottom)
                .padding([0, 0, 120, 0])
                .into(),
        )
    }

    /// Modal card over a dimmed screen
    fn build_dialog(&self) -> Option<Element<'_, Message>> {
        let spacing = cosmic::theme::spacing();
        let (title, body) = match self.dialog? {
            AppDialog::PermissionsRequired => (
                fl!("permissions-required-title"),
                fl!("permissions-required-body"),
            ),
        };

        let card = widget::column::with_capacity(3)
            .push(widget::text::title4(title))
            .push(widget::text::body(body))
            .push(
                widget::row::with_capacity(2)
                    .push(widget::horizontal_space())
                    .push(widget::button::suggested(fl!("close")).on_press(Message::CloseDialog)),
            )
            .spacing(spacing.space_s)
            .max_width(420.0);

        let card = widget::container(card)
            .padding(spacing.space_m)
            .class(cosmic::theme::Container::Dialog);

        // Any click dismisses; nothing reaches the screen below
        Some(
            widget::mouse_area(
                widget::container(card)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .style(|_theme| widget::container::Style {
                        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.5))),
                        ..Default::default()
                    }),
            )
            .on_press(Message::CloseDialog)
            .into(),
        )
    }
}
