// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate view

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::permissions::{PermissionKind, PermissionStatus};
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    pub fn build_permissions_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut rows = widget::list_column();
        for kind in PermissionKind::ALL {
            rows = rows.add(self.build_permission_row(kind));
        }

        let continue_button = widget::button::suggested(fl!("permissions-continue"))
            .on_press(Message::ContinueFromPermissions);

        let column = widget::column::with_capacity(5)
            .push(widget::text::title3(fl!("permissions-title")))
            .push(widget::text::body(fl!("permissions-intro")))
            .push(rows)
            .push(
                widget::row::with_capacity(2)
                    .push(widget::horizontal_space())
                    .push(continue_button),
            )
            .spacing(spacing.space_m)
            .max_width(ui::PERMISSION_COLUMN_WIDTH);

        widget::container(widget::scrollable(column))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .padding(spacing.space_l)
            .into()
    }

    /// Name, description, status and the request switch for one permission
    fn build_permission_row(&self, kind: PermissionKind) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let status = self.gate.status(kind);
        let pending = self.gate.is_pending(kind);

        let (title, description) = match kind {
            PermissionKind::Camera => (
                fl!("permission-camera"),
                fl!("permission-camera-description"),
            ),
            PermissionKind::Microphone => (
                fl!("permission-microphone"),
                fl!("permission-microphone-description"),
            ),
            PermissionKind::MediaLibrary => (
                fl!("permission-media-library"),
                fl!(
                    "permission-media-library-description",
                    folder = self.library_folders().photos.display().to_string()
                ),
            ),
        };

        let status_label = if pending {
            fl!("status-pending")
        } else {
            match status {
                PermissionStatus::Granted => fl!("status-granted"),
                PermissionStatus::Denied => fl!("status-denied"),
                PermissionStatus::NotDetermined => fl!("status-not-determined"),
            }
        };

        // A granted permission cannot be revoked from here; a pending one waits for its answer
        let mut toggler = widget::toggler(status.is_granted());
        if !status.is_granted() && !pending {
            toggler = toggler.on_toggle(move |_| Message::RequestPermission(kind));
        }

        let text = widget::column::with_capacity(3)
            .push(widget::text::heading(title))
            .push(widget::text::caption(description))
            .push(widget::text::caption(status_label).class(cosmic::theme::Text::Accent))
            .spacing(2);

        widget::row::with_capacity(2)
            .push(widget::container(text).width(Length::Fill))
            .push(toggler)
            .spacing(spacing.space_s)
            .align_y(Alignment::Center)
            .into()
    }
}
