// SPDX-License-Identifier: GPL-3.0-only

//! Permission gate controller

use crate::navigation::{Route, Router};
use crate::permissions::{PermissionKind, PermissionState, PermissionStatus};
use std::collections::HashSet;
use tracing::{debug, info};

/// What pressing "continue" leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Replace the route with the capture screen
    Proceed,
    /// Show the "enable permissions in settings" dialog
    Blocked,
}

/// Permission state plus the requests currently waiting on the platform
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    state: PermissionState,
    pending: HashSet<PermissionKind>,
    /// Whether the first status query has answered
    loaded: bool,
}

impl PermissionGate {
    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn status(&self, kind: PermissionKind) -> PermissionStatus {
        self.state.status(kind)
    }

    pub fn is_pending(&self, kind: PermissionKind) -> bool {
        self.pending.contains(&kind)
    }

    /// Store the result of a status query
    ///
    /// Kinds with a request in flight keep their current value; the request
    /// answer is newer.
    pub fn apply_query(&mut self, queried: PermissionState) {
        for kind in PermissionKind::ALL {
            if !self.is_pending(kind) {
                self.state.set(kind, queried.status(kind));
            }
        }
        self.loaded = true;
        debug!(state = ?self.state, "Permission state loaded");
    }

    /// Mark a request as started; false when one of that kind is already pending
    pub fn begin_request(&mut self, kind: PermissionKind) -> bool {
        if !self.pending.insert(kind) {
            debug!(%kind, "Permission request already pending, ignoring toggle");
            return false;
        }
        info!(%kind, "Requesting permission");
        true
    }

    /// Record the platform's answer and release the guard
    pub fn complete_request(&mut self, kind: PermissionKind, status: PermissionStatus) {
        self.pending.remove(&kind);
        self.state.set(kind, status);
        info!(%kind, %status, "Permission request finished");
    }

    /// The capture route may only render when this is false
    pub fn needs_permission_screen(&self) -> bool {
        self.state.needs_permission_screen()
    }

    /// Send a capture route to the gate once the query says access is missing
    ///
    /// Returns true when the router was changed.
    pub fn redirect(&self, router: &mut Router) -> bool {
        if *router.current() != Route::Capture || !self.loaded || !self.needs_permission_screen() {
            return false;
        }
        info!(state = ?self.state, "Camera access missing, redirecting to permissions");
        router.replace(Route::Permissions);
        true
    }

    pub fn continue_decision(&self) -> GateDecision {
        if self.state.all_granted() {
            GateDecision::Proceed
        } else {
            GateDecision::Blocked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_request_is_ignored_until_complete() {
        let mut gate = PermissionGate::default();
        assert!(gate.begin_request(PermissionKind::Camera));
        assert!(!gate.begin_request(PermissionKind::Camera));
        assert!(gate.begin_request(PermissionKind::Microphone));

        gate.complete_request(PermissionKind::Camera, PermissionStatus::Granted);
        assert!(!gate.is_pending(PermissionKind::Camera));
        assert!(gate.begin_request(PermissionKind::Camera));
    }

    #[test]
    fn test_query_does_not_override_pending_request() {
        let mut gate = PermissionGate::default();
        gate.begin_request(PermissionKind::Camera);
        gate.apply_query(PermissionState {
            camera: PermissionStatus::Denied,
            microphone: PermissionStatus::Granted,
            media_library: true,
        });
        assert_eq!(gate.status(PermissionKind::Camera), PermissionStatus::NotDetermined);
        assert_eq!(gate.status(PermissionKind::Microphone), PermissionStatus::Granted);
        assert!(gate.is_loaded());
    }

    #[test]
    fn test_continue_requires_everything() {
        let mut gate = PermissionGate::default();
        gate.complete_request(PermissionKind::Camera, PermissionStatus::Granted);
        gate.complete_request(PermissionKind::Microphone, PermissionStatus::Granted);
        assert_eq!(gate.continue_decision(), GateDecision::Blocked);
        assert!(!gate.needs_permission_screen());

        gate.complete_request(PermissionKind::MediaLibrary, PermissionStatus::Granted);
        assert_eq!(gate.continue_decision(), GateDecision::Proceed);
    }

    #[test]
    fn test_denial_can_be_requested_again() {
        let mut gate = PermissionGate::default();
        gate.begin_request(PermissionKind::Camera);
        gate.complete_request(PermissionKind::Camera, PermissionStatus::Denied);
        assert!(gate.needs_permission_screen());
        assert!(gate.begin_request(PermissionKind::Camera));
    }

    #[test]
    fn test_redirect_waits_for_the_query() {
        let mut router = Router::default();
        let gate = PermissionGate::default();
        assert!(!gate.redirect(&mut router));
        assert_eq!(*router.current(), Route::Capture);
    }

    #[test]
    fn test_redirect_replaces_capture_only() {
        let mut gate = PermissionGate::default();
        gate.apply_query(PermissionState {
            camera: PermissionStatus::Denied,
            microphone: PermissionStatus::Granted,
            media_library: true,
        });

        let mut router = Router::default();
        router.push(Route::media("/tmp/img.jpg", "photo"));
        assert!(!gate.redirect(&mut router));
        assert_eq!(router.depth(), 2);

        router.back();
        assert!(gate.redirect(&mut router));
        assert_eq!(*router.current(), Route::Permissions);
        assert_eq!(router.depth(), 1);
        assert!(!gate.redirect(&mut router));
    }
}
