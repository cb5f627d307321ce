use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Remote render service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the render API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Deep link opened after a successful upload.
    /// `{video_id}` is replaced by the URL-encoded video ID.
    #[serde(default = "default_redirect_template")]
    pub redirect_url_template: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            redirect_url_template: default_redirect_template(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.voia.com/api".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_redirect_template() -> String {
    "https://voia.sng.link/Cle3b/dk59?_dl=campaign&pcn=Moshe7&pcrn=Miriam3&_smtype=3&campaign_id={video_id}"
        .to_string()
}

/// Render progress tracking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Delay between two status checks of the same video (milliseconds).
    /// The first check fires one full interval after tracking starts.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up after this many consecutive failed status checks (0 = never).
    /// Giving up moves the video to the error state.
    #[serde(default)]
    pub max_consecutive_failures: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_consecutive_failures: 0,
        }
    }
}

fn default_poll_interval() -> u64 {
    30_000 // 30 seconds
}
