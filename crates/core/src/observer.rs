//! Render lifecycle notifications.
//!
//! The host application implements [`RenderObserver`] and installs it on the
//! session. The session only keeps a weak reference: dropping the observer on
//! the host side silently stops delivery.

use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use url::Url;

/// Receives render lifecycle events for tracked videos.
///
/// For a given video, `on_render_started` fires at most once and before any
/// `on_render_progressed`. Nothing fires after `on_render_complete` or
/// `on_render_failed`.
pub trait RenderObserver: Send + Sync {
    /// Cloud render started. Rendering can take several minutes.
    fn on_render_started(&self, video_id: &str);

    /// Render progress changed (0.0 - 1.0).
    fn on_render_progressed(&self, video_id: &str, progress: f64);

    /// Render failed; no further events follow for this video.
    fn on_render_failed(&self, video_id: &str, message: &str);

    /// Render finished and the video is publicly available at `public_url`.
    fn on_render_complete(&self, video_id: &str, public_url: &Url);
}

/// Shared, replaceable slot holding the session's observer.
#[derive(Clone, Default)]
pub struct ObserverSlot {
    inner: Arc<RwLock<Option<Weak<dyn RenderObserver>>>>,
}

impl ObserverSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an observer, replacing any previous one.
    pub async fn set(&self, observer: &Arc<dyn RenderObserver>) {
        *self.inner.write().await = Some(Arc::downgrade(observer));
    }

    /// Remove the observer.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// The current observer, if one is installed and still alive.
    pub async fn current(&self) -> Option<Arc<dyn RenderObserver>> {
        self.inner.read().await.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot").finish_non_exhaustive()
    }
}
