//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborators
//! (render API, observer, host app), allowing the pipeline and the trackers
//! to be exercised without a network or a UI.
//!
//! # Example
//!
//! ```rust,ignore
//! use voialink_core::testing::{MockRenderApi, RecordingObserver, RecordingHost};
//!
//! let api = Arc::new(MockRenderApi::new());
//! api.set_project_id("v1").await;
//! api.push_statuses("v1", vec![StatusSample::complete("c1", "https://cdn/v1.mp4")]).await;
//!
//! let link = VoiaLink::new(config, Arc::new(RecordingHost::new()))?;
//! link.register_with_api(api.clone()).await;
//! ```

mod mock_api;
mod recording;

pub use mock_api::{ApiCall, ApiOperation, MockRenderApi, RecordedCall};
pub use recording::{RecordedShare, RecordingHost, RecordingObserver, RenderEvent};

/// Test fixtures and helper functions.
pub mod fixtures {
    use url::Url;

    use crate::config::{Config, TrackerConfig};

    /// Poll interval used by fixtures (same as the production default).
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

    /// Tracker config polling every [`DEFAULT_POLL_INTERVAL_MS`], no failure limit.
    pub fn tracker_config() -> TrackerConfig {
        TrackerConfig {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_consecutive_failures: 0,
        }
    }

    /// Default config with the fixture tracker settings.
    pub fn config() -> Config {
        Config {
            tracker: tracker_config(),
            ..Config::default()
        }
    }

    /// A remote soundtrack URL.
    pub fn remote_audio_url() -> Url {
        Url::parse("https://cdn.example.com/audio/song.mp3").unwrap()
    }
}
