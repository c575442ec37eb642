// SPDX-License-Identifier: GPL-3.0-only

//! Navigation handlers
//!
//! Every route change goes through [`AppModel::route_changed`], which applies
//! the permission redirect and sets up the screen being shown.

use crate::app::state::{AppModel, Message, NoticeKind};
use crate::constants::timing;
use crate::navigation::Route;
use crate::screens::ReviewScreen;
use crate::storage::MediaKind;
use cosmic::Task;
use cosmic::widget::image;
use tracing::debug;

impl AppModel {
    pub(crate) fn handle_navigate(&mut self, route: Route) -> Task<cosmic::Action<Message>> {
        self.router.navigate(route);
        self.route_changed()
    }

    pub(crate) fn handle_back(&mut self) -> Task<cosmic::Action<Message>> {
        self.router.back();
        self.route_changed()
    }

    /// Redirect and mount after the router moved
    pub(crate) fn route_changed(&mut self) -> Task<cosmic::Action<Message>> {
        self.gate.redirect(&mut self.router);

        let current = self.router.current().clone();
        if self.mounted.as_ref() == Some(&current) {
            return Task::none();
        }
        let previous = self.mounted.replace(current.clone());
        debug!(from = ?previous, to = %current, "Mounting screen");

        if previous == Some(Route::Capture) {
            self.leave_capture();
        }
        if !matches!(current, Route::Media { .. }) {
            self.review = None;
            self.review_image = None;
        }

        match current {
            Route::Capture => {
                self.capture.remount();
                self.sync_device_settings();
                Task::none()
            }
            Route::Media { .. } => {
                self.enter_review(&current);
                Task::none()
            }
            Route::Permissions => Task::none(),
        }
    }

    /// Release what the capture screen holds: torch, flash, last frame
    fn leave_capture(&mut self) {
        if self.capture.settings().torch.is_on() || self.flash_active {
            self.flash_leds.set_all(false);
        }
        self.flash_active = false;
        self.current_frame = None;
        self.preview_handle = None;
        self.preview_error = None;
    }

    fn enter_review(&mut self, route: &Route) {
        let review = ReviewScreen::from_route(route).unwrap_or(ReviewScreen::Invalid);
        self.review_image = review
            .media()
            .filter(|m| m.media.kind == MediaKind::Photo)
            .map(|m| image::Handle::from_path(&m.media.path));
        self.review = Some(review);
    }

    /// Show a transient notice and schedule its dismissal
    pub(crate) fn push_notice(
        &mut self,
        kind: NoticeKind,
        text: impl Into<String>,
    ) -> Task<cosmic::Action<Message>> {
        let id = self.notices.push(kind, text);
        Self::notice_dismissal(id)
    }

    /// Dismiss a notice once it has been shown long enough
    pub(crate) fn notice_dismissal(id: u64) -> Task<cosmic::Action<Message>> {
        Self::delay_task(
            timing::NOTICE_DURATION.as_millis() as u64,
            Message::DismissNotice(id),
        )
    }
}
