// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::preview::FrameAdjustments;
use crate::backends::camera::{CameraDevice, CameraFrame, SystemCameraBackend};
use crate::backends::flash::FlashLeds;
use crate::config::Config;
use crate::navigation::{Route, Router};
use crate::permissions::{PermissionKind, PermissionState, PermissionStatus, SystemPermissions};
use crate::screens::{CaptureScreen, OverlayMode, PermissionGate, ReviewScreen, SaveTracker};
pub use crate::screens::{Notice, NoticeKind, Notices};
use crate::storage::LibraryFolders;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;

/// Context drawer pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextPage {
    #[default]
    Settings,
    About,
}

/// Blocking dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDialog {
    /// "Enable permissions in system settings"
    PermissionsRequired,
}

/// Main application state
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,

    // ===== Navigation =====
    pub router: Router,
    /// Route whose screen was last set up, to detect (re)mounts
    pub mounted: Option<Route>,

    // ===== Permissions =====
    pub gate: PermissionGate,
    pub permissions: SystemPermissions,

    // ===== Camera =====
    pub camera_backend: SystemCameraBackend,
    pub capture: CaptureScreen,
    /// Whether camera enumeration has finished at least once
    pub cameras_loaded: bool,
    /// Adjustments read by the preview pipeline on every frame
    pub adjustments: Arc<FrameAdjustments>,
    /// Latest preview frame, the source of captured photos
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Latest preview frame as a widget image
    pub preview_handle: Option<image::Handle>,
    pub preview_error: Option<String>,
    pub flash_leds: Arc<FlashLeds>,
    /// White screen flash while waiting for a flash capture
    pub flash_active: bool,

    // ===== Review =====
    pub review: Option<ReviewScreen>,
    pub review_image: Option<image::Handle>,
    /// Library save in flight; outlives the review screen that started it
    pub saves: SaveTracker,
    /// Directory holding unsaved captures
    pub capture_dir: PathBuf,

    // ===== Feedback =====
    pub notices: Notices,
    pub dialog: Option<AppDialog>,

    // ===== Settings drawer =====
    /// Theme dropdown labels, indexed like `Message::SetAppTheme`
    pub theme_options: Vec<String>,
    /// Facing dropdown labels, indexed like `Message::SetPreferredFacing`
    pub facing_options: Vec<String>,
}

impl AppModel {
    /// Library folders for the configured folder name
    pub fn library_folders(&self) -> LibraryFolders {
        LibraryFolders::for_user(&self.config.effective_folder_name())
    }

    /// The capture screen may only render with camera access and a microphone answer
    pub fn capture_allowed(&self) -> bool {
        self.gate.is_loaded() && !self.gate.needs_permission_screen()
    }

    /// Whether the preview pipeline should be running
    pub fn preview_wanted(&self) -> bool {
        *self.router.current() == Route::Capture && self.capture_allowed()
    }
}

/// Messages emitted by the application and its widgets
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Go to a route, unwinding history when it is already open
    Navigate(Route),
    /// Pop the current screen
    Back,
    DismissNotice(u64),
    CloseDialog,

    // ===== Permissions =====
    /// Initial status query finished
    PermissionsQueried(PermissionState),
    /// User toggled a permission switch
    RequestPermission(PermissionKind),
    /// The platform answered a request
    PermissionAnswered(PermissionKind, PermissionStatus),
    ContinueFromPermissions,
    /// Settings button on the capture screen
    OpenPermissions,

    // ===== Camera =====
    /// Camera enumeration finished
    CamerasEnumerated(Vec<CameraDevice>),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),
    /// The preview pipeline could not start or stopped with an error
    PreviewFailed(String),
    SwitchFacing,
    SetZoom(f32),
    SetExposureBias(f32),
    ToggleFlash,
    ToggleTorch,
    ToggleOverlay(OverlayMode),
    CloseOverlay,

    // ===== Capture =====
    Capture,
    /// Flash duration elapsed, take the frame now
    FlashComplete,
    /// Encode finished for the given capture generation
    PhotoCaptured(u64, Result<PathBuf, String>),
    OpenGallery,

    // ===== Review =====
    SaveToLibrary,
    SaveFinished(Result<PathBuf, String>),
    DiscardAndBack,
    OpenVideo,
    CaptureRemoved(Result<bool, String>),
    StaleCapturesPurged(usize),

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
    SetAppTheme(usize),
    ToggleMirrorPreview,
    SetPreferredFacing(usize),
    SetJpegQuality(u8),
}
