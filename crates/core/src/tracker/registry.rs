//! Registry of status pollers, one per video.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;

use crate::api::RenderApi;
use crate::config::TrackerConfig;
use crate::observer::ObserverSlot;

use super::poller::StatusPoller;
use super::types::PollerSnapshot;

/// Maps video IDs to their status poller.
///
/// Pollers are created on first access and never evicted for the lifetime
/// of the registry. Swapping the transport with [`TrackerRegistry::set_api`]
/// only affects pollers created afterwards.
pub struct TrackerRegistry {
    trackers: RwLock<HashMap<String, Arc<StatusPoller>>>,
    api: RwLock<Arc<dyn RenderApi>>,
    observer: ObserverSlot,
    config: TrackerConfig,
}

impl TrackerRegistry {
    pub fn new(api: Arc<dyn RenderApi>, observer: ObserverSlot, config: TrackerConfig) -> Self {
        Self {
            trackers: RwLock::new(HashMap::new()),
            api: RwLock::new(api),
            observer,
            config,
        }
    }

    /// Get the poller for a video, creating (and starting) it if needed.
    ///
    /// Concurrent calls for the same video all receive the same instance.
    pub async fn get_or_create(&self, video_id: &str) -> Arc<StatusPoller> {
        if let Some(tracker) = self.trackers.read().await.get(video_id) {
            return Arc::clone(tracker);
        }

        let mut trackers = self.trackers.write().await;
        let api = Arc::clone(&*self.api.read().await);
        let tracker = trackers.entry(video_id.to_string()).or_insert_with(|| {
            Arc::new(StatusPoller::spawn(
                video_id,
                api,
                self.observer.clone(),
                self.config.clone(),
            ))
        });
        Arc::clone(tracker)
    }

    /// Transport for pollers created from now on. Running pollers keep theirs.
    pub async fn set_api(&self, api: Arc<dyn RenderApi>) {
        *self.api.write().await = api;
    }

    /// Get the poller for a video without creating one.
    pub async fn get(&self, video_id: &str) -> Option<Arc<StatusPoller>> {
        self.trackers.read().await.get(video_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.trackers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trackers.read().await.is_empty()
    }

    /// Snapshots of every tracked video.
    pub async fn snapshots(&self) -> Vec<PollerSnapshot> {
        let trackers: Vec<Arc<StatusPoller>> =
            self.trackers.read().await.values().cloned().collect();
        join_all(trackers.iter().map(|t| t.snapshot())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockRenderApi};
    use crate::tracker::VideoStatus;

    fn registry() -> (Arc<MockRenderApi>, Arc<TrackerRegistry>) {
        let api = Arc::new(MockRenderApi::new());
        let registry = Arc::new(TrackerRegistry::new(
            Arc::clone(&api) as Arc<dyn RenderApi>,
            ObserverSlot::new(),
            fixtures::tracker_config(),
        ));
        (api, registry)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance() {
        let (_api, registry) = registry();

        let first = registry.get_or_create("v1").await;
        let second = registry.get_or_create("v1").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
        assert_eq!(first.status().await, VideoStatus::Unknown);
    }

    #[tokio::test]
    async fn test_distinct_videos_get_distinct_pollers() {
        let (_api, registry) = registry();

        let a = registry.get_or_create("a").await;
        let b = registry.get_or_create("b").await;

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.video_id(), "a");
        assert_eq!(b.video_id(), "b");
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_creation_has_single_winner() {
        let (_api, registry) = registry();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.get_or_create("shared").await })
            })
            .collect();

        let pollers: Vec<Arc<StatusPoller>> = join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert!(pollers.iter().all(|p| Arc::ptr_eq(p, &pollers[0])));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let (_api, registry) = registry();

        assert!(registry.get("v1").await.is_none());
        assert!(registry.is_empty().await);

        registry.get_or_create("v1").await;
        assert!(registry.get("v1").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_api_applies_to_new_pollers_only() {
        let (old_api, registry) = registry();
        registry.get_or_create("a").await;

        let new_api = Arc::new(MockRenderApi::new());
        registry.set_api(Arc::clone(&new_api) as Arc<dyn RenderApi>).await;
        registry.get_or_create("a").await;
        registry.get_or_create("b").await;
        assert_eq!(registry.len().await, 2);

        tokio::time::sleep(std::time::Duration::from_millis(
            fixtures::DEFAULT_POLL_INTERVAL_MS + 1,
        ))
        .await;

        assert_eq!(old_api.status_request_count("a").await, 1);
        assert_eq!(old_api.status_request_count("b").await, 0);
        assert_eq!(new_api.status_request_count("a").await, 0);
        assert_eq!(new_api.status_request_count("b").await, 1);
    }

    #[tokio::test]
    async fn test_snapshots_cover_all_trackers() {
        let (_api, registry) = registry();
        registry.get_or_create("a").await;
        registry.get_or_create("b").await;

        let mut ids: Vec<String> = registry
            .snapshots()
            .await
            .into_iter()
            .map(|s| s.video_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
