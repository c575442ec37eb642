// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer
//!
//! Appearance, camera defaults and where saved media goes.

pub mod view;
