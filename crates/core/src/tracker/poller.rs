//! Per-video render status poller.
//!
//! Each poller owns one background task. The task sleeps for the configured
//! interval, performs one status check, and only then re-arms the sleep, so
//! checks of the same video never overlap even when the service is slow.
//! Reaching a terminal state cancels the task for good.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{ApiError, RenderApi, StatusSample};
use crate::config::TrackerConfig;
use crate::metrics;
use crate::observer::ObserverSlot;

use super::types::{PollerSnapshot, VideoStatus};

/// Error message recorded when the service does not know the project.
pub const PROJECT_NOT_FOUND: &str = "Project not found";

/// What a single status sample means for a video.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Negative progress: the service does not know this project.
    NotFound,
    /// Render finished at the given URL.
    Complete(Url),
    /// Render finished but the URL could not be parsed.
    InvalidUrl(String),
    /// First sample carrying a render attempt ID.
    Started { cinematic_id: String, progress: f64 },
    /// Later sample for an already started render.
    Progressed { cinematic_id: String, progress: f64 },
    /// Nothing to report yet.
    Quiet,
}

/// Interpret a status sample given the render attempt ID seen so far.
///
/// Rules are checked in order and the first match wins.
pub fn interpret(known_cinematic_id: Option<&str>, sample: &StatusSample) -> TickOutcome {
    if sample.progress < 0.0 {
        return TickOutcome::NotFound;
    }

    if sample.progress == 1.0 {
        if let Some(raw) = &sample.url {
            return match Url::parse(raw) {
                Ok(url) => TickOutcome::Complete(url),
                Err(_) => TickOutcome::InvalidUrl(raw.clone()),
            };
        }
    }

    if let Some(cinematic_id) = &sample.cinematic_id {
        let cinematic_id = cinematic_id.clone();
        let progress = sample.progress;
        return if known_cinematic_id.is_none() {
            TickOutcome::Started {
                cinematic_id,
                progress,
            }
        } else {
            TickOutcome::Progressed {
                cinematic_id,
                progress,
            }
        };
    }

    TickOutcome::Quiet
}

/// Event to hand to the observer once the state lock is released.
enum Notification {
    Started,
    Progressed(f64),
    Failed(String),
    Complete(Url),
}

#[derive(Debug, Default)]
struct JobState {
    status: VideoStatus,
    cinematic_id: Option<String>,
    polls: u64,
    consecutive_failures: u32,
    last_polled_at: Option<DateTime<Utc>>,
}

struct PollerShared {
    video_id: String,
    state: RwLock<JobState>,
    api: Arc<dyn RenderApi>,
    observer: ObserverSlot,
    config: TrackerConfig,
    cancel: CancellationToken,
}

/// Tracks the render status of one video by polling the render API.
///
/// Dropping the poller stops its background task.
pub struct StatusPoller {
    shared: Arc<PollerShared>,
    task: JoinHandle<()>,
}

impl StatusPoller {
    /// Create a poller and start its background task.
    ///
    /// The first status check happens one full interval from now.
    /// Must be called within a tokio runtime.
    pub fn spawn(
        video_id: impl Into<String>,
        api: Arc<dyn RenderApi>,
        observer: ObserverSlot,
        config: TrackerConfig,
    ) -> Self {
        let shared = Arc::new(PollerShared {
            video_id: video_id.into(),
            state: RwLock::new(JobState::default()),
            api,
            observer,
            config,
            cancel: CancellationToken::new(),
        });

        let task = tokio::spawn(Arc::clone(&shared).run());
        metrics::TRACKERS_CREATED.inc();
        info!("Progress tracker created for {}", shared.video_id);

        Self { shared, task }
    }

    pub fn video_id(&self) -> &str {
        &self.shared.video_id
    }

    /// Current render status.
    pub async fn status(&self) -> VideoStatus {
        self.shared.state.read().await.status.clone()
    }

    /// Render attempt ID, once observed.
    pub async fn cinematic_id(&self) -> Option<String> {
        self.shared.state.read().await.cinematic_id.clone()
    }

    /// Whether further status checks are scheduled.
    pub fn is_polling(&self) -> bool {
        !self.shared.cancel.is_cancelled() && !self.task.is_finished()
    }

    /// Stop scheduling status checks without changing the status.
    ///
    /// A check already in flight is discarded when it returns.
    pub fn stop(&self) {
        if !self.shared.cancel.is_cancelled() {
            info!("Stopped tracking video {}", self.shared.video_id);
            self.shared.cancel.cancel();
        }
    }

    pub async fn snapshot(&self) -> PollerSnapshot {
        let state = self.shared.state.read().await;
        PollerSnapshot {
            video_id: self.shared.video_id.clone(),
            cinematic_id: state.cinematic_id.clone(),
            status: state.status.clone(),
            polls: state.polls,
            consecutive_failures: state.consecutive_failures,
            last_polled_at: state.last_polled_at,
            polling: self.is_polling(),
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("video_id", &self.shared.video_id)
            .field("polling", &self.is_polling())
            .finish()
    }
}

impl PollerShared {
    async fn run(self: Arc<Self>) {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        debug!("Status polling started for {}", self.video_id);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    self.tick().await;
                }
            }
        }

        debug!("Status polling stopped for {}", self.video_id);
    }

    async fn tick(&self) {
        let cinematic_id = {
            let mut state = self.state.write().await;
            state.polls += 1;
            state.cinematic_id.clone()
        };

        let result = self
            .api
            .fetch_status(&self.video_id, cinematic_id.as_deref())
            .await;

        // Stopped while the check was in flight: drop the answer, good or bad
        if self.cancel.is_cancelled() {
            return;
        }

        let sample = match result {
            Ok(sample) => {
                metrics::STATUS_POLLS.with_label_values(&["sample"]).inc();
                sample
            }
            Err(e) if e.is_not_found_signal() => {
                metrics::STATUS_POLLS.with_label_values(&["not_found"]).inc();
                StatusSample::not_found()
            }
            Err(e) => {
                metrics::STATUS_POLLS.with_label_values(&["failed"]).inc();
                self.record_failure(e).await;
                return;
            }
        };

        self.apply(sample).await;
    }

    async fn apply(&self, sample: StatusSample) {
        debug!(
            "Progress for video {}: {}. id {}",
            self.video_id,
            sample.progress,
            sample.cinematic_id.as_deref().unwrap_or("None")
        );

        let notification = {
            let mut state = self.state.write().await;
            if state.status.is_terminal() {
                return;
            }
            state.consecutive_failures = 0;
            state.last_polled_at = Some(Utc::now());

            match interpret(state.cinematic_id.as_deref(), &sample) {
                TickOutcome::NotFound => {
                    state.status = VideoStatus::Error(PROJECT_NOT_FOUND.to_string());
                    Some(Notification::Failed(PROJECT_NOT_FOUND.to_string()))
                }
                TickOutcome::Complete(url) => {
                    state.status = VideoStatus::RenderComplete(url.clone());
                    Some(Notification::Complete(url))
                }
                TickOutcome::InvalidUrl(raw) => {
                    let message = format!("Invalid render URL: {}", raw);
                    state.status = VideoStatus::Error(message.clone());
                    Some(Notification::Failed(message))
                }
                TickOutcome::Started {
                    cinematic_id,
                    progress,
                } => {
                    state.cinematic_id = Some(cinematic_id);
                    state.status = VideoStatus::RenderInProgress(progress);
                    Some(Notification::Started)
                }
                TickOutcome::Progressed {
                    cinematic_id,
                    progress,
                } => {
                    state.cinematic_id = Some(cinematic_id);
                    state.status = VideoStatus::RenderInProgress(progress);
                    Some(Notification::Progressed(progress))
                }
                TickOutcome::Quiet => None,
            }
        };

        if let Some(notification) = notification {
            self.deliver(notification).await;
        }
    }

    async fn record_failure(&self, error: ApiError) {
        let failures = {
            let mut state = self.state.write().await;
            state.consecutive_failures += 1;
            state.consecutive_failures
        };
        warn!(
            "Status check {} failed for video {}: {}",
            failures, self.video_id, error
        );

        let limit = self.config.max_consecutive_failures;
        if limit == 0 || failures < limit {
            return;
        }

        let message = format!("Status polling failed {} times in a row", failures);
        {
            let mut state = self.state.write().await;
            if state.status.is_terminal() {
                return;
            }
            state.status = VideoStatus::Error(message.clone());
        }
        self.deliver(Notification::Failed(message)).await;
    }

    /// Hand an event to the observer. Terminal events also stop polling.
    async fn deliver(&self, notification: Notification) {
        let terminal = matches!(
            notification,
            Notification::Failed(_) | Notification::Complete(_)
        );
        if terminal {
            self.cancel.cancel();
        }

        let observer = self.observer.current().await;
        let video_id = self.video_id.as_str();
        match notification {
            Notification::Started => {
                info!("Render started for video {}", video_id);
                metrics::RENDER_EVENTS.with_label_values(&["started"]).inc();
                if let Some(observer) = observer {
                    observer.on_render_started(video_id);
                }
            }
            Notification::Progressed(progress) => {
                metrics::RENDER_EVENTS
                    .with_label_values(&["progressed"])
                    .inc();
                if let Some(observer) = observer {
                    observer.on_render_progressed(video_id, progress);
                }
            }
            Notification::Failed(message) => {
                warn!("Render failed for video {}: {}", video_id, message);
                metrics::RENDER_EVENTS.with_label_values(&["failed"]).inc();
                if let Some(observer) = observer {
                    observer.on_render_failed(video_id, &message);
                }
            }
            Notification::Complete(url) => {
                info!("Render complete for video {}: {}", video_id, url);
                metrics::RENDER_EVENTS.with_label_values(&["completed"]).inc();
                if let Some(observer) = observer {
                    observer.on_render_complete(video_id, &url);
                }
            }
        }
    }
}
