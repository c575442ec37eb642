// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::Facing;
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = match self.config.app_theme {
            AppTheme::System => 0,
            AppTheme::Dark => 1,
            AppTheme::Light => 2,
        };
        let theme_dropdown =
            widget::dropdown(&self.theme_options, Some(theme_index), Message::SetAppTheme);

        let facing_index = match self.config.preferred_facing {
            Facing::Front => 0,
            Facing::Back => 1,
        };
        let facing_dropdown = widget::dropdown(
            &self.facing_options,
            Some(facing_index),
            Message::SetPreferredFacing,
        );

        let mirror_toggle =
            widget::toggler(self.config.mirror_preview).on_toggle(|_| Message::ToggleMirrorPreview);

        let quality = self.config.effective_jpeg_quality();
        let quality_slider = widget::slider(1..=100, quality, Message::SetJpegQuality)
            .width(Length::Fill);

        let folders = self.library_folders();

        let version_info = fl!(
            "version",
            version = app_info::version(),
            environment = app_info::runtime_environment()
        );

        let settings_column: Element<'_, Message> = widget::column()
            .push(section_title(fl!("settings-appearance")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(labeled_row(fl!("settings-theme"), theme_dropdown))
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-camera")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(labeled_row(fl!("settings-start-facing"), facing_dropdown))
            .push(widget::vertical_space().height(spacing.space_xs))
            .push(labeled_row(fl!("settings-mirror-preview"), mirror_toggle))
            .push(widget::vertical_space().height(spacing.space_xs))
            .push(labeled_row(
                fl!("settings-jpeg-quality"),
                widget::text::body(quality.to_string()),
            ))
            .push(quality_slider)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-save-folder")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text::body(folders.photos.display().to_string()))
            .push(widget::text::body(folders.videos.display().to_string()))
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(
                        widget::text(version_info)
                            .size(12)
                            .class(cosmic::theme::Text::Accent),
                    )
                    .push(widget::horizontal_space())
                    .push(
                        widget::button::text(fl!("about"))
                            .on_press(Message::ToggleContextPage(ContextPage::About)),
                    )
                    .align_y(Alignment::Center),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn section_title<'a>(title: String) -> Element<'a, Message> {
    widget::text(title).size(16).font(cosmic::font::bold()).into()
}

fn labeled_row<'a>(label: String, control: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    widget::row()
        .push(widget::text::body(label))
        .push(widget::horizontal_space().width(Length::Fill))
        .push(control)
        .align_y(Alignment::Center)
        .into()
}
