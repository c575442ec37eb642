// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are grouped by the screen they serve, keeping related
//! functionality together for easier maintenance.

pub mod capture;
pub mod navigation;
pub mod permissions;
pub mod review;
pub mod system;
