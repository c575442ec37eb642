// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, notices)
//! - `update`: Message dispatch
//! - `handlers`: Message handlers grouped by screen
//! - `view`: Root view, notices, dialog and flash overlays
//! - `capture_view`, `permissions_view`, `review_view`: one view per screen
//! - `controls`: Capture button and overlay sliders
//! - `settings`: Settings drawer
//!
//! Screen state and decisions live in [`crate::screens`]; this module turns
//! them into widgets and tasks.

mod capture_view;
mod controls;
mod handlers;
mod permissions_view;
mod review_view;
pub mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::preview::{FrameAdjustments, PreviewPipeline};
use crate::backends::camera::{CameraBackend, SystemCameraBackend};
use crate::backends::flash::FlashLeds;
use crate::config::Config;
use crate::constants::{APP_ID, pipeline, timing};
use crate::fl;
use crate::navigation::Router;
use crate::permissions::{PermissionBackend, SystemPermissions};
use crate::screens::{CaptureScreen, PermissionGate, SaveTracker};
use crate::storage::{self, LibraryFolders};
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppDialog, AppModel, ContextPage, Message, Notice, NoticeKind, Notices};
use std::sync::Arc;
use tracing::{debug, error, info};

const REPOSITORY: &str = "https://github.com/visioncam/visioncam";

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name(APP_ID).handle())
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // GStreamer must be initialized before any pipeline is built
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let folders = LibraryFolders::for_user(&config.effective_folder_name());
        let permissions = SystemPermissions::new(folders.photos);
        let capture_dir = storage::capture_dir();
        info!(capture_dir = %capture_dir.display(), "Capture directory");

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            capture: CaptureScreen::new(config.preferred_facing),
            config,
            config_handler,
            router: Router::default(),
            mounted: None,
            gate: PermissionGate::default(),
            permissions,
            camera_backend: SystemCameraBackend::new(),
            cameras_loaded: false,
            adjustments: Arc::new(FrameAdjustments::default()),
            current_frame: None,
            preview_handle: None,
            preview_error: None,
            flash_leds: Arc::new(FlashLeds::discover()),
            flash_active: false,
            review: None,
            review_image: None,
            saves: SaveTracker::default(),
            capture_dir,
            notices: Notices::default(),
            dialog: None,
            theme_options: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            facing_options: vec![fl!("facing-front"), fl!("facing-back")],
        };

        // Permission status decides the first screen
        let backend = app.permissions.clone();
        let permissions_task = Task::perform(async move { backend.query_all().await }, |state| {
            cosmic::Action::App(Message::PermissionsQueried(state))
        });

        // Enumerate cameras off the UI thread (pw-cli and ioctls can be slow)
        let camera_backend = app.camera_backend;
        let cameras_task = Task::perform(
            async move {
                tokio::task::spawn_blocking(move || camera_backend.enumerate_cameras())
                    .await
                    .unwrap_or_else(|e| {
                        error!(error = %e, "Camera enumeration task failed");
                        Vec::new()
                    })
            },
            |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
        );

        // Leftovers from earlier sessions that were neither saved nor discarded
        let capture_dir = app.capture_dir.clone();
        let purge_task = Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    storage::purge_stale_captures(&capture_dir, timing::STALE_CAPTURE_AGE)
                })
                .await
                .unwrap_or(0)
            },
            |removed| cosmic::Action::App(Message::StaleCapturesPurged(removed)),
        );

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (
            app,
            Task::batch([permissions_task, cameras_task, purge_task, theme_task]),
        )
    }

    /// Elements to pack at the start of the header bar.
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        if self.router.can_go_back() {
            vec![
                widget::button::icon(widget::icon::from_name("go-previous-symbolic"))
                    .on_press_maybe((!self.saves.is_pending()).then_some(Message::Back))
                    .into(),
            ]
        } else {
            vec![]
        }
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // One pipeline per active device; a new id (facing switch) drops the old
        // pipeline before the new one starts. Leaving the capture screen drops it too.
        let device = self
            .capture
            .active_device()
            .filter(|_| self.preview_wanted())
            .cloned();

        let camera_sub = match device {
            Some(device) => {
                let adjustments = Arc::clone(&self.adjustments);
                Subscription::run_with_id(
                    ("camera", device.id()),
                    cosmic::iced::stream::channel(
                        pipeline::FRAME_CHANNEL_CAPACITY,
                        move |mut output| async move {
                            info!(device = %device.name, "Camera subscription started");

                            let (sender, mut receiver) =
                                cosmic::iced::futures::channel::mpsc::channel(
                                    pipeline::FRAME_CHANNEL_CAPACITY,
                                );

                            let pipeline =
                                match PreviewPipeline::new(&device, adjustments, sender) {
                                    Ok(pipeline) => pipeline,
                                    Err(e) => {
                                        error!(error = %e, "Failed to initialize pipeline");
                                        let _ = output
                                            .send(Message::PreviewFailed(e.to_string()))
                                            .await;
                                        return;
                                    }
                                };

                            let mut frame_count = 0u64;
                            loop {
                                if output.is_closed() {
                                    info!("Output channel closed - camera subscription cancelled");
                                    break;
                                }

                                if let Some(err) = pipeline.poll_error() {
                                    error!(error = %err, "Preview pipeline error");
                                    let _ = output.send(Message::PreviewFailed(err)).await;
                                    break;
                                }

                                // Short timeout so cancellation is noticed between frames
                                match tokio::time::timeout(
                                    tokio::time::Duration::from_millis(16),
                                    receiver.next(),
                                )
                                .await
                                {
                                    Ok(Some(frame)) => {
                                        frame_count += 1;
                                        match output.try_send(Message::CameraFrame(Arc::new(frame)))
                                        {
                                            Ok(()) => {}
                                            Err(e) if e.is_disconnected() => {
                                                info!("Output channel disconnected");
                                                break;
                                            }
                                            Err(_) => {
                                                // Dropping frames is fine for live preview
                                                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                                    debug!(
                                                        frame = frame_count,
                                                        "Frame dropped (UI busy)"
                                                    );
                                                }
                                            }
                                        }
                                    }
                                    Ok(None) => {
                                        info!("Preview frame stream ended");
                                        break;
                                    }
                                    Err(_) => continue,
                                }
                            }

                            info!(frames = frame_count, "Cleaning up preview pipeline");
                            drop(pipeline);
                        },
                    ),
                )
            }
            None => Subscription::none(),
        };

        Subscription::batch([config_sub, camera_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
