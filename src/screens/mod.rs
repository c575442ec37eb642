// SPDX-License-Identifier: GPL-3.0-only

//! Screen controllers
//!
//! Each screen keeps its state and decision logic here, independent of the
//! widget tree. The `app` module renders them and turns their decisions into
//! tasks.
//!
//! - `permissions`: the permission gate at `/permissions`
//! - `capture`: live preview and capture settings at `/`
//! - `review`: captured media review at `/media`
//! - `notices`: toasts shared by all screens

pub mod capture;
pub mod notices;
pub mod permissions;
pub mod review;

pub use capture::{CaptureScreen, CaptureSettings, OverlayMode, Switch};
pub use notices::{Notice, NoticeKind, Notices};
pub use permissions::{GateDecision, PermissionGate};
pub use review::{PendingSave, ReviewMedia, ReviewScreen, SaveFollowUp, SaveOutcome, SaveTracker};
