//! Types for render progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Status of a video's cloud render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum VideoStatus {
    /// Nothing is known yet (initial state of every video).
    #[default]
    Unknown,
    /// Render running; partial progress between 0 and 1.
    RenderInProgress(f64),
    /// Render finished; publicly accessible video URL.
    RenderComplete(Url),
    /// Render failed or the project is unknown.
    Error(String),
}

impl VideoStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::RenderComplete(_) | VideoStatus::Error(_))
    }

    /// Returns the string representation for logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Unknown => "unknown",
            VideoStatus::RenderInProgress(_) => "render_in_progress",
            VideoStatus::RenderComplete(_) => "render_complete",
            VideoStatus::Error(_) => "error",
        }
    }
}

/// Point-in-time view of one tracked video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerSnapshot {
    /// Video ID assigned by the render service.
    pub video_id: String,
    /// Active render attempt, once observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cinematic_id: Option<String>,
    /// Current render status.
    pub status: VideoStatus,
    /// Number of status checks performed.
    pub polls: u64,
    /// Status checks that failed in a row (reset by any answer).
    pub consecutive_failures: u32,
    /// When the last status check completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<DateTime<Utc>>,
    /// Whether further status checks are scheduled.
    pub polling: bool,
}
