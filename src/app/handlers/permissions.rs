// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate handlers

use crate::app::state::{AppDialog, AppModel, Message};
use crate::navigation::Route;
use crate::permissions::{PermissionBackend, PermissionKind, PermissionState, PermissionStatus};
use crate::screens::GateDecision;
use cosmic::Task;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_permissions_queried(
        &mut self,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        info!(?state, "Permission status queried");
        self.gate.apply_query(state);
        self.route_changed()
    }

    /// Ask the platform for one permission; ignored while the same kind is pending
    pub(crate) fn handle_request_permission(
        &mut self,
        kind: PermissionKind,
    ) -> Task<cosmic::Action<Message>> {
        if !self.gate.begin_request(kind) {
            return Task::none();
        }
        let backend = self.permissions.clone();
        Task::perform(async move { backend.request(kind).await }, move |status| {
            cosmic::Action::App(Message::PermissionAnswered(kind, status))
        })
    }

    pub(crate) fn handle_permission_answered(
        &mut self,
        kind: PermissionKind,
        status: PermissionStatus,
    ) -> Task<cosmic::Action<Message>> {
        self.gate.complete_request(kind, status);
        Task::none()
    }

    pub(crate) fn handle_continue_from_permissions(&mut self) -> Task<cosmic::Action<Message>> {
        match self.gate.continue_decision() {
            GateDecision::Proceed => {
                info!("All permissions granted, continuing to capture");
                // Opened from the capture screen: unwind instead of stacking a second one
                if self.router.can_go_back() {
                    self.router.navigate(Route::Capture);
                } else {
                    self.router.replace(Route::Capture);
                }
                self.route_changed()
            }
            GateDecision::Blocked => {
                info!(state = ?self.gate.state(), "Permissions missing, showing dialog");
                self.dialog = Some(AppDialog::PermissionsRequired);
                Task::none()
            }
        }
    }

    /// Settings button on the capture screen
    pub(crate) fn handle_open_permissions(&mut self) -> Task<cosmic::Action<Message>> {
        self.router.push(Route::Permissions);
        self.route_changed()
    }
}
