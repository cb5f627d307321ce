//! Video creation pipeline implementation.
//!
//! create project -> sign upload target -> upload media -> redirect + track.
//! Each step runs only if the previous one succeeded; the first failure ends
//! the run with a single error.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::api::{RenderApi, AUDIO_UPLOAD_EXT};
use crate::error::{LinkError, PipelineStep};
use crate::host::{redirect_url, HostApp};
use crate::metrics;
use crate::tracker::TrackerRegistry;

use super::types::{AudioSource, CreateVideoRequest};

/// Runs the video creation steps against the render API.
pub struct CreationPipeline {
    api: Arc<dyn RenderApi>,
    registry: Arc<TrackerRegistry>,
    host: Arc<dyn HostApp>,
    redirect_template: String,
}

impl CreationPipeline {
    pub fn new(
        api: Arc<dyn RenderApi>,
        registry: Arc<TrackerRegistry>,
        host: Arc<dyn HostApp>,
        redirect_template: impl Into<String>,
    ) -> Self {
        Self {
            api,
            registry,
            host,
            redirect_template: redirect_template.into(),
        }
    }

    /// Create a video and start tracking its render.
    ///
    /// Returns the video ID on success. On failure no redirect happens and
    /// no tracker is created.
    pub async fn create_video(&self, request: &CreateVideoRequest) -> Result<String, LinkError> {
        let result = self.run(request).await;

        let label = match &result {
            Ok(_) => "success",
            Err(LinkError::ApiCallFailed { step, .. }) => step.as_str(),
            Err(_) => "error",
        };
        metrics::VIDEOS_CREATED.with_label_values(&[label]).inc();

        if let Err(e) = &result {
            warn!("Video creation failed: {}", e);
        }
        result
    }

    async fn run(&self, request: &CreateVideoRequest) -> Result<String, LinkError> {
        info!("Creating a project");
        let video_id = self.create_project(request).await?;
        info!("Project created: {}", video_id);

        info!("Get signed url for {}", video_id);
        let signed_url = self.sign_upload(&video_id).await?;

        info!("Upload audio to {}", signed_url);
        self.upload(&request.source(), &signed_url).await?;

        self.redirect(&video_id);
        self.registry.get_or_create(&video_id).await;

        Ok(video_id)
    }

    async fn create_project(&self, request: &CreateVideoRequest) -> Result<String, LinkError> {
        let step = PipelineStep::CreateProject;
        let body = self
            .api
            .create_project(&request.project_fields())
            .await
            .map_err(|e| LinkError::api_call_failed(step, e.to_string()))?;

        let video_id = body.trim();
        if video_id.is_empty() {
            return Err(LinkError::api_call_failed(step, "no video ID in response"));
        }
        Ok(video_id.to_string())
    }

    async fn sign_upload(&self, video_id: &str) -> Result<Url, LinkError> {
        let step = PipelineStep::SignUpload;
        let body = self
            .api
            .sign_upload(video_id, AUDIO_UPLOAD_EXT)
            .await
            .map_err(|e| LinkError::api_call_failed(step, e.to_string()))?;

        let raw = body.trim();
        if raw.is_empty() {
            return Err(LinkError::api_call_failed(step, "no signed URL in response"));
        }
        Url::parse(raw).map_err(|e| {
            LinkError::api_call_failed(step, format!("invalid signed URL {}: {}", raw, e))
        })
    }

    async fn upload(&self, source: &AudioSource, dest: &Url) -> Result<(), LinkError> {
        let step = PipelineStep::Upload;
        match source {
            AudioSource::LocalFile(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    LinkError::api_call_failed(
                        step,
                        format!("failed to read audio file {}: {}", path.display(), e),
                    )
                })?;
                info!("Uploading from {}", path.display());
                self.api
                    .upload_bytes(dest, data)
                    .await
                    .map_err(|e| LinkError::api_call_failed(step, e.to_string()))
            }
            AudioSource::Remote(src) => {
                info!("Copying from {}", src);
                self.api
                    .copy_remote(src, dest)
                    .await
                    .map_err(|e| LinkError::api_call_failed(step, e.to_string()))
            }
        }
    }

    fn redirect(&self, video_id: &str) {
        match redirect_url(&self.redirect_template, video_id) {
            Ok(url) => {
                info!("Redirect to {}", url);
                self.host.open_url(&url);
            }
            Err(e) => warn!("Invalid redirect URL for video {}: {}", video_id, e),
        }
    }
}
