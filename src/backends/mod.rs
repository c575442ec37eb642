// SPDX-License-Identifier: MPL-2.0

//! Hardware access
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐  ┌────────┐  ┌──────────┐  │
//! │  │   Camera    │  │ Audio  │  │  Flash   │  │
//! │  │ (PW / V4L2) │  │(probe) │  │ (sysfs)  │  │
//! │  └─────────────┘  └────────┘  └──────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`camera`]: device discovery, zoom/exposure controls and the preview pipeline
//! - [`audio`]: microphone discovery (used for the permission gate)
//! - [`flash`]: flash/torch LEDs

pub mod audio;
pub mod camera;
pub mod flash;
