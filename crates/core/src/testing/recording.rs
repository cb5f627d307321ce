//! Recording observer and host for testing.

use std::sync::Mutex;

use url::Url;

use crate::host::{HostApp, ShareMethod};
use crate::observer::RenderObserver;

/// A render lifecycle event received by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Started { video_id: String },
    Progressed { video_id: String, progress: f64 },
    Failed { video_id: String, message: String },
    Complete { video_id: String, public_url: Url },
}

impl RenderEvent {
    pub fn started(video_id: &str) -> Self {
        RenderEvent::Started {
            video_id: video_id.to_string(),
        }
    }

    pub fn progressed(video_id: &str, progress: f64) -> Self {
        RenderEvent::Progressed {
            video_id: video_id.to_string(),
            progress,
        }
    }

    pub fn failed(video_id: &str, message: &str) -> Self {
        RenderEvent::Failed {
            video_id: video_id.to_string(),
            message: message.to_string(),
        }
    }

    /// Panics if `public_url` is not a valid URL.
    pub fn complete(video_id: &str, public_url: &str) -> Self {
        RenderEvent::Complete {
            video_id: video_id.to_string(),
            public_url: Url::parse(public_url).expect("valid URL in test event"),
        }
    }

    pub fn video_id(&self) -> &str {
        match self {
            RenderEvent::Started { video_id }
            | RenderEvent::Progressed { video_id, .. }
            | RenderEvent::Failed { video_id, .. }
            | RenderEvent::Complete { video_id, .. } => video_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RenderEvent::Failed { .. } | RenderEvent::Complete { .. }
        )
    }
}

/// Observer that records every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events received for one video.
    pub fn events_for(&self, video_id: &str) -> Vec<RenderEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.video_id() == video_id)
            .collect()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RenderObserver for RecordingObserver {
    fn on_render_started(&self, video_id: &str) {
        self.push(RenderEvent::started(video_id));
    }

    fn on_render_progressed(&self, video_id: &str, progress: f64) {
        self.push(RenderEvent::progressed(video_id, progress));
    }

    fn on_render_failed(&self, video_id: &str, message: &str) {
        self.push(RenderEvent::failed(video_id, message));
    }

    fn on_render_complete(&self, video_id: &str, public_url: &Url) {
        self.push(RenderEvent::Complete {
            video_id: video_id.to_string(),
            public_url: public_url.clone(),
        });
    }
}

/// A share request received by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedShare {
    pub video_id: String,
    pub method: ShareMethod,
    pub public_url: Url,
}

/// Host that records redirects and share requests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    opened: Mutex<Vec<Url>>,
    shares: Mutex<Vec<RecordedShare>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened_urls(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }

    pub fn shares(&self) -> Vec<RecordedShare> {
        self.shares.lock().unwrap().clone()
    }
}

impl HostApp for RecordingHost {
    fn open_url(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.clone());
    }

    fn share(&self, video_id: &str, method: &ShareMethod, public_url: &Url) {
        self.shares.lock().unwrap().push(RecordedShare {
            video_id: video_id.to_string(),
            method: method.clone(),
            public_url: public_url.clone(),
        });
    }
}
