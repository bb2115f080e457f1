// SPDX-License-Identifier: MPL-2.0

//! Main application module for Quickshot
//!
//! # Architecture
//!
//! - `screen`: toolkit-independent camera screen state machine
//! - `state`: application model, messages, context pages
//! - `notice`: timed capture failure notice
//! - `camera_preview`: live preview display
//! - `controls`: shutter and flip buttons
//! - `review_overlay`: full-screen view of the last capture
//! - `settings`: settings drawer UI
//! - `view`: main view rendering
//! - `update` + `handlers`: message handling
//!
//! The live feed runs in a subscription keyed on the facing direction, so a
//! flip tears the old feed down and opens a new one.

mod camera_preview;
mod controls;
mod handlers;
pub mod notice;
mod review_overlay;
pub mod screen;
mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::types::{BackendError, Facing};
use crate::backends::camera::{self, CameraProvider};
use crate::config::{AppTheme, Config};
use crate::constants::{QualityPreset, pipeline, timing};
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use screen::{CaptureOutcome, Effect, Phase, PermissionState, Screen};
pub use notice::{Notice, NoticeSlot};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{info, warn};

const REPOSITORY: &str = "https://github.com/quickshot-app/quickshot";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.quickshot.Quickshot.svg");

/// Startup options
#[derive(Clone, Default)]
pub struct Flags {
    /// Camera capability to use instead of the platform one
    pub provider: Option<Arc<dyn CameraProvider>>,
}

impl std::fmt::Debug for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flags")
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    type Flags = Flags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.quickshot.Quickshot";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application and mounts the camera screen.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = Config::load(Self::APP_ID);

        let provider = flags
            .provider
            .unwrap_or_else(|| camera::get_provider(config.effective_jpeg_quality()));

        let theme_options = AppTheme::ALL
            .iter()
            .map(|theme| match theme {
                AppTheme::System => fl!("match-desktop"),
                AppTheme::Dark => fl!("dark"),
                AppTheme::Light => fl!("light"),
            })
            .collect();
        let quality_options = QualityPreset::ALL
            .iter()
            .map(|preset| match preset {
                QualityPreset::Standard => fl!("quality-standard"),
                QualityPreset::High => fl!("quality-high"),
                QualityPreset::Maximum => fl!("quality-maximum"),
            })
            .collect();

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            screen: Screen::new(),
            provider,
            preview: None,
            review_image: None,
            notice: NoticeSlot::new(),
            theme_options,
            quality_options,
        };

        let mount_task = match app.screen.mount() {
            Effect::RequestPermission => {
                info!("Requesting camera permission");
                app.request_permission_task()
            }
            _ => Task::none(),
        };

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        // Captures are never kept across runs
        let cleanup_task =
            handlers::capture::clear_stale_captures_task(crate::storage::capture_directory());

        (app, Task::batch([cleanup_task, mount_task, theme_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
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

    /// The window is going away: late results must not touch the screen.
    fn on_close_requested(&self, _id: cosmic::iced::window::Id) -> Option<Self::Message> {
        Some(Message::Unmount)
    }

    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let feed_sub = if self.screen.wants_feed() {
            camera_feed(Arc::clone(&self.provider), self.screen.facing())
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, feed_sub])
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

/// Live feed for one facing direction
///
/// Opens the feed, reports `FeedAttached` on the first frame, forwards frames
/// (dropping them when the UI is behind), and reports `FeedDetached` when the
/// feed ends. Failed opens are retried after a delay. Dropping the
/// subscription (flip, permission change) drops the feed and stops the camera.
fn camera_feed(provider: Arc<dyn CameraProvider>, facing: Facing) -> Subscription<Message> {
    use cosmic::iced::futures::{SinkExt, StreamExt};

    Subscription::run_with_id(
        ("camera-feed", facing),
        cosmic::iced::stream::channel(
            pipeline::SUBSCRIPTION_CHANNEL_CAPACITY,
            move |mut output| async move {
                info!(%facing, "Camera feed subscription started");

                loop {
                    let opener = Arc::clone(&provider);
                    let opened = tokio::task::spawn_blocking(move || opener.open_feed(facing))
                        .await
                        .map_err(|e| BackendError::Other(e.to_string()))
                        .and_then(|result| result);

                    let feed = match opened {
                        Ok(feed) => feed,
                        Err(err) => {
                            warn!(%facing, error = %err, "Failed to open camera feed, retrying");
                            tokio::time::sleep(timing::FEED_RETRY_DELAY).await;
                            continue;
                        }
                    };

                    // The guard keeps the pipeline running until this iteration ends
                    let (handle, mut frames, _guard) = feed.into_parts();
                    let mut attached = false;
                    let mut frame_count = 0u64;

                    loop {
                        if output.is_closed() {
                            info!(%facing, "Camera feed subscription cancelled");
                            return;
                        }

                        match tokio::time::timeout(timing::FRAME_POLL_INTERVAL, frames.next()).await
                        {
                            Ok(Some(frame)) => {
                                frame_count += 1;
                                if !attached {
                                    attached = true;
                                    let message = Message::FeedAttached(facing, Arc::clone(&handle));
                                    if output.send(message).await.is_err() {
                                        return;
                                    }
                                }

                                if let Err(e) =
                                    output.try_send(Message::CameraFrame(facing, Arc::new(frame)))
                                {
                                    if e.is_disconnected() {
                                        return;
                                    }
                                    if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                        warn!(frame = frame_count, "Frame dropped (UI channel full)");
                                    }
                                }
                            }
                            Ok(None) => {
                                info!(%facing, frames = frame_count, "Camera feed ended");
                                break;
                            }
                            Err(_) => continue,
                        }
                    }

                    if attached && output.send(Message::FeedDetached(facing)).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(timing::FEED_RETRY_DELAY).await;
                }
            },
        ),
    )
}
