//! Mock render API for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

use crate::api::{ApiError, ProjectFields, RenderApi, StatusSample};

/// Render API operations, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    CreateProject,
    SignUpload,
    UploadBytes,
    CopyRemote,
    FetchStatus,
}

/// A call made against the mock, for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateProject(ProjectFields),
    SignUpload { video_id: String, ext: String },
    UploadBytes { dest: Url, len: usize },
    CopyRemote { src: Url, dest: Url },
    FetchStatus {
        video_id: String,
        cinematic_id: Option<String>,
    },
}

/// A recorded call with its timestamp.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub call: ApiCall,
    pub timestamp: DateTime<Utc>,
}

/// Mock implementation of the RenderApi trait.
///
/// Provides controllable behavior for testing:
/// - Record every call for assertions
/// - Script status answers per video
/// - Simulate failures per operation
///
/// # Example
///
/// ```rust,ignore
/// let api = MockRenderApi::new();
/// api.set_project_id("v1").await;
/// api.push_statuses("v1", vec![
///     StatusSample::rendering("c1", 0.5),
///     StatusSample::complete("c1", "https://cdn/v1.mp4"),
/// ]).await;
///
/// // ... run the pipeline / pollers ...
///
/// assert_eq!(api.status_request_count("v1").await, 2);
/// ```
///
/// When a video's status script runs out, further checks answer with a
/// not-yet-started sample (progress 0, no render attempt).
#[derive(Debug)]
pub struct MockRenderApi {
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    project_id: Arc<RwLock<Option<String>>>,
    signed_url: Arc<RwLock<Option<String>>>,
    statuses: Arc<RwLock<HashMap<String, VecDeque<Result<StatusSample, ApiError>>>>>,
    failures: Arc<RwLock<HashMap<ApiOperation, ApiError>>>,
    status_delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockRenderApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderApi {
    /// Create a new mock render API.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            project_id: Arc::new(RwLock::new(None)),
            signed_url: Arc::new(RwLock::new(None)),
            statuses: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            status_delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Body returned by the next project creations (random ID if unset).
    pub async fn set_project_id(&self, id: impl Into<String>) {
        *self.project_id.write().await = Some(id.into());
    }

    /// Body returned by upload signing (derived from the video ID if unset).
    pub async fn set_signed_url(&self, url: impl Into<String>) {
        *self.signed_url.write().await = Some(url.into());
    }

    /// Queue status answers for a video.
    pub async fn push_statuses(&self, video_id: &str, samples: Vec<StatusSample>) {
        let mut statuses = self.statuses.write().await;
        let queue = statuses.entry(video_id.to_string()).or_default();
        queue.extend(samples.into_iter().map(Ok));
    }

    /// Queue a failed status answer for a video.
    pub async fn push_status_error(&self, video_id: &str, error: ApiError) {
        self.statuses
            .write()
            .await
            .entry(video_id.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// Make the next call of `operation` fail with `error`.
    pub async fn fail_next(&self, operation: ApiOperation, error: ApiError) {
        self.failures.write().await.insert(operation, error);
    }

    /// Delay every status answer by `delay`.
    pub async fn set_status_delay(&self, delay: Duration) {
        *self.status_delay.write().await = Some(delay);
    }

    /// All recorded calls, oldest first.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls
            .read()
            .await
            .iter()
            .map(|r| r.call.clone())
            .collect()
    }

    /// All recorded calls with timestamps.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Cinematic IDs sent with each status check of a video.
    pub async fn status_requests(&self, video_id: &str) -> Vec<Option<String>> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|r| match &r.call {
                ApiCall::FetchStatus {
                    video_id: id,
                    cinematic_id,
                } if id == video_id => Some(cinematic_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of status checks made for a video.
    pub async fn status_request_count(&self, video_id: &str) -> usize {
        self.status_requests(video_id).await.len()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    async fn record(&self, call: ApiCall) {
        self.calls.write().await.push(RecordedCall {
            call,
            timestamp: Utc::now(),
        });
    }

    async fn take_failure(&self, operation: ApiOperation) -> Option<ApiError> {
        self.failures.write().await.remove(&operation)
    }
}

#[async_trait]
impl RenderApi for MockRenderApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_project(&self, fields: &ProjectFields) -> Result<String, ApiError> {
        self.record(ApiCall::CreateProject(fields.clone())).await;
        if let Some(err) = self.take_failure(ApiOperation::CreateProject).await {
            return Err(err);
        }

        let id = self.project_id.read().await.clone();
        Ok(id.unwrap_or_else(|| format!("video-{}", Uuid::new_v4().simple())))
    }

    async fn sign_upload(&self, video_id: &str, ext: &str) -> Result<String, ApiError> {
        self.record(ApiCall::SignUpload {
            video_id: video_id.to_string(),
            ext: ext.to_string(),
        })
        .await;
        if let Some(err) = self.take_failure(ApiOperation::SignUpload).await {
            return Err(err);
        }

        let url = self.signed_url.read().await.clone();
        Ok(url.unwrap_or_else(|| format!("https://upload.mock/{}.{}", video_id, ext)))
    }

    async fn upload_bytes(&self, dest: &Url, data: Vec<u8>) -> Result<(), ApiError> {
        self.record(ApiCall::UploadBytes {
            dest: dest.clone(),
            len: data.len(),
        })
        .await;
        match self.take_failure(ApiOperation::UploadBytes).await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn copy_remote(&self, src: &Url, dest: &Url) -> Result<(), ApiError> {
        self.record(ApiCall::CopyRemote {
            src: src.clone(),
            dest: dest.clone(),
        })
        .await;
        match self.take_failure(ApiOperation::CopyRemote).await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn fetch_status(
        &self,
        video_id: &str,
        cinematic_id: Option<&str>,
    ) -> Result<StatusSample, ApiError> {
        self.record(ApiCall::FetchStatus {
            video_id: video_id.to_string(),
            cinematic_id: cinematic_id.map(str::to_string),
        })
        .await;

        let delay = *self.status_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_failure(ApiOperation::FetchStatus).await {
            return Err(err);
        }

        let next = self
            .statuses
            .write()
            .await
            .get_mut(video_id)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(StatusSample::pending(0.0)))
    }
}
