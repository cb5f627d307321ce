//! Bridge to host application side effects.
//!
//! Launching the Voia app and presenting share sheets belong to the host
//! application. The core only decides *when* they happen.

use tracing::info;
use url::Url;

use crate::config::VIDEO_ID_PLACEHOLDER;

/// Ways of sharing a rendered video out of the host app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareMethod {
    /// Share through a locally installed Instagram app.
    /// Requires an Instagram app ID issued by Meta.
    Instagram { app_id: String },
    /// Share through the standard system share sheet.
    System,
}

/// Side effects performed by the host application.
pub trait HostApp: Send + Sync {
    /// Open a URL, typically the deep link into the Voia app.
    fn open_url(&self, url: &Url);

    /// Share a rendered video available at `public_url`.
    fn share(&self, video_id: &str, method: &ShareMethod, public_url: &Url);
}

/// Host that only logs. Useful for headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct LoggingHost;

impl HostApp for LoggingHost {
    fn open_url(&self, url: &Url) {
        info!("Redirect to {}", url);
    }

    fn share(&self, video_id: &str, method: &ShareMethod, public_url: &Url) {
        info!(
            "Share video {} via {:?} from {}",
            video_id, method, public_url
        );
    }
}

/// Build the redirect URL for a video from the configured template.
pub fn redirect_url(template: &str, video_id: &str) -> Result<Url, url::ParseError> {
    let encoded = urlencoding::encode(video_id);
    Url::parse(&template.replace(VIDEO_ID_PLACEHOLDER, &encoded))
}
