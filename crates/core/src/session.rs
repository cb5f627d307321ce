//! Session facade for host applications.
//!
//! The host builds one [`VoiaLink`] at startup and keeps it for the life of
//! the process. Nothing works until a client secret is registered; every
//! call before that fails with [`LinkError::MissingClientSecret`] without
//! touching the network.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::api::{HttpRenderApi, RenderApi};
use crate::config::{validate_config, Config};
use crate::error::LinkError;
use crate::host::{HostApp, ShareMethod};
use crate::observer::{ObserverSlot, RenderObserver};
use crate::pipeline::{CreateVideoRequest, CreationPipeline};
use crate::tracker::{PollerSnapshot, TrackerRegistry, VideoStatus};

/// Everything bound to one registered client secret.
struct ActiveSession {
    registry: Arc<TrackerRegistry>,
    pipeline: CreationPipeline,
}

/// Entry point of the SDK.
pub struct VoiaLink {
    config: Config,
    host: Arc<dyn HostApp>,
    observer: ObserverSlot,
    session: RwLock<Option<Arc<ActiveSession>>>,
}

impl VoiaLink {
    /// Create an unregistered session. Fails if `config` is invalid.
    pub fn new(config: Config, host: Arc<dyn HostApp>) -> Result<Self, LinkError> {
        validate_config(&config)?;

        Ok(Self {
            config,
            host,
            observer: ObserverSlot::new(),
            session: RwLock::new(None),
        })
    }

    /// Register the client secret issued by Voia.
    ///
    /// Replaces any previous registration. Videos already tracked keep
    /// polling with the previous secret; new videos use this one.
    pub async fn register(&self, client_secret: impl Into<String>) -> Result<(), LinkError> {
        let secret = client_secret.into();
        if secret.trim().is_empty() {
            return Err(LinkError::MissingClientSecret);
        }

        let api = HttpRenderApi::new(&self.config.api, secret)?;
        self.register_with_api(Arc::new(api)).await;
        Ok(())
    }

    /// Register with a custom render API implementation.
    ///
    /// The tracker registry survives re-registration, so a video never gets
    /// a second poller.
    pub async fn register_with_api(&self, api: Arc<dyn RenderApi>) {
        let mut session = self.session.write().await;

        let registry = match session.as_ref() {
            Some(previous) => {
                previous.registry.set_api(Arc::clone(&api)).await;
                Arc::clone(&previous.registry)
            }
            None => Arc::new(TrackerRegistry::new(
                Arc::clone(&api),
                self.observer.clone(),
                self.config.tracker.clone(),
            )),
        };
        let pipeline = CreationPipeline::new(
            Arc::clone(&api),
            Arc::clone(&registry),
            Arc::clone(&self.host),
            self.config.api.redirect_url_template.clone(),
        );

        *session = Some(Arc::new(ActiveSession { registry, pipeline }));
        info!("Secret registered ({} transport)", api.name());
    }

    pub async fn is_registered(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Install the render observer. Only a weak reference is kept: the host
    /// must keep `observer` alive for as long as it wants events.
    pub async fn set_observer(&self, observer: &Arc<dyn RenderObserver>) {
        self.observer.set(observer).await;
    }

    pub async fn clear_observer(&self) {
        self.observer.clear().await;
    }

    /// Start creating a new video.
    ///
    /// On success the host is redirected to the Voia app, render tracking
    /// starts, and the new video ID is returned.
    pub async fn create_video(&self, request: CreateVideoRequest) -> Result<String, LinkError> {
        let session = self.active().await?;
        session.pipeline.create_video(&request).await
    }

    /// Current render status of a video.
    ///
    /// Unknown video IDs start being tracked from this call on.
    pub async fn status_for(&self, video_id: &str) -> Result<VideoStatus, LinkError> {
        let session = self.active().await?;
        Ok(session.registry.get_or_create(video_id).await.status().await)
    }

    /// Tracking details of a video. Starts tracking unknown video IDs.
    pub async fn snapshot(&self, video_id: &str) -> Result<PollerSnapshot, LinkError> {
        let session = self.active().await?;
        Ok(session.registry.get_or_create(video_id).await.snapshot().await)
    }

    /// Share a rendered video through the host app.
    pub async fn share(&self, video_id: &str, method: ShareMethod) -> Result<(), LinkError> {
        let session = self.active().await?;
        let status = match session.registry.get(video_id).await {
            Some(tracker) => tracker.status().await,
            None => VideoStatus::Unknown,
        };

        match status {
            VideoStatus::RenderComplete(url) => {
                self.host.share(video_id, &method, &url);
                Ok(())
            }
            _ => Err(LinkError::VideoNotReady(video_id.to_string())),
        }
    }

    /// Stop polling a video. Its last known status is kept.
    ///
    /// Returns false if the video was not tracked or had already stopped.
    pub async fn stop_tracking(&self, video_id: &str) -> Result<bool, LinkError> {
        let session = self.active().await?;
        match session.registry.get(video_id).await {
            Some(tracker) if tracker.is_polling() => {
                tracker.stop();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Snapshots of every video tracked under the current registration.
    pub async fn tracked_videos(&self) -> Result<Vec<PollerSnapshot>, LinkError> {
        let session = self.active().await?;
        Ok(session.registry.snapshots().await)
    }

    async fn active(&self) -> Result<Arc<ActiveSession>, LinkError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(LinkError::MissingClientSecret)
    }
}
