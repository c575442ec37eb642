// SPDX-License-Identifier: GPL-3.0-only

//! Review screen handlers

use crate::app::state::{AppModel, Message};
use crate::navigation::Route;
use crate::storage::{self, MediaLibrary};
use cosmic::Task;
use std::path::PathBuf;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_save_to_library(&mut self) -> Task<cosmic::Action<Message>> {
        let route = self.router.current().clone();
        let Some((path, kind)) = self
            .saves
            .begin(self.review.as_mut(), &route, &self.capture_dir)
        else {
            return Task::none();
        };

        let library = self.library_folders();
        info!(path = %path.display(), kind = kind.as_str(), "Saving to library");
        Task::perform(
            async move { library.save(path, kind).await.map_err(|e| e.to_string()) },
            |result| cosmic::Action::App(Message::SaveFinished(result)),
        )
    }

    pub(crate) fn handle_save_finished(
        &mut self,
        result: Result<PathBuf, String>,
    ) -> Task<cosmic::Action<Message>> {
        let follow_up = self.saves.settle(
            self.review.as_mut(),
            result,
            &mut self.router,
            &mut self.notices,
        );

        let dismissal = follow_up.notice.map_or_else(Task::none, Self::notice_dismissal);
        let cleanup = self.remove_capture_task(follow_up.cleanup);
        let navigation = if follow_up.navigated {
            self.route_changed()
        } else {
            Task::none()
        };
        Task::batch([dismissal, cleanup, navigation])
    }

    /// Return to the capture screen, deleting the temporary capture
    pub(crate) fn handle_discard_and_back(&mut self) -> Task<cosmic::Action<Message>> {
        let target = self
            .review
            .as_ref()
            .and_then(|r| r.media())
            .and_then(|m| m.discard_target(&self.capture_dir));
        let cleanup = self.remove_capture_task(target);
        let navigation = self.handle_navigate(Route::Capture);
        Task::batch([cleanup, navigation])
    }

    pub(crate) fn handle_open_video(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(media) = self.review.as_ref().and_then(|r| r.media()) {
            info!(path = %media.media.path.display(), "Opening video in system player");
            if let Err(e) = open::that_detached(&media.media.path) {
                warn!(error = %e, "Failed to open video");
            }
        }
        Task::none()
    }

    pub(crate) fn remove_capture_task(&self, target: Option<PathBuf>) -> Task<cosmic::Action<Message>> {
        let Some(path) = target else {
            return Task::none();
        };
        let capture_dir = self.capture_dir.clone();
        Task::perform(
            async move {
                storage::remove_capture(&path, &capture_dir)
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::CaptureRemoved(result)),
        )
    }
}
