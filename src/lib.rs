// SPDX-License-Identifier: MPL-2.0

//! VisionCam - a camera application with a permission gate and media review
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: libcosmic application shell, messages and views
//! - [`screens`]: per-screen state and decisions (gate, capture, review)
//! - [`backends`]: camera discovery, V4L2 controls, preview pipeline, flash LEDs, audio sources
//! - [`permissions`]: permission model and the desktop permission backend
//! - [`navigation`]: named routes and the navigation stack
//! - [`photo`]: JPEG encoding of captured frames
//! - [`storage`]: temporary captures and the media library
//! - [`gallery`]: system gallery shortcut
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // visioncam
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod gallery;
pub mod i18n;
pub mod navigation;
pub mod permissions;
pub mod photo;
pub mod screens;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use navigation::{Route, Router};
