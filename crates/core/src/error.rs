//! Errors surfaced to the host application.

use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Stage of the video creation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Project creation on the render service.
    CreateProject,
    /// Signed upload target request.
    SignUpload,
    /// Media upload or remote copy.
    Upload,
}

impl PipelineStep {
    /// Returns the string representation used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::CreateProject => "create_project",
            PipelineStep::SignUpload => "sign_upload",
            PipelineStep::Upload => "upload",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the session facade.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The session was used before a client secret was registered.
    #[error("Client secret not registered")]
    MissingClientSecret,

    /// A creation pipeline call failed or returned an unusable payload.
    #[error("API call failed during {step}: {reason}")]
    ApiCallFailed { step: PipelineStep, reason: String },

    /// The video has no finished render to act on yet.
    #[error("Video render not complete: {0}")]
    VideoNotReady(String),

    /// The render API client could not be built.
    #[error("Failed to set up render transport: {0}")]
    Transport(#[from] ApiError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LinkError {
    pub fn api_call_failed(step: PipelineStep, reason: impl Into<String>) -> Self {
        LinkError::ApiCallFailed {
            step,
            reason: reason.into(),
        }
    }
}
