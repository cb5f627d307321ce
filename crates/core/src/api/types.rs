//! Types for render API operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// File extension requested for signed audio uploads.
pub const AUDIO_UPLOAD_EXT: &str = "mp3";

/// Errors that can occur during render API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ApiError {
    /// The status endpoint answers 400 for projects it does not know about.
    pub fn is_not_found_signal(&self) -> bool {
        matches!(self, ApiError::Http { status: 400, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

/// Optional metadata sent when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    /// Song name embedded on the video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,
    /// Artist / user screen name embedded on the video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

impl ProjectFields {
    /// Query pairs for the fields that are present.
    pub fn to_query(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(artist) = &self.artist {
            params.push(("artist", artist.as_str()));
        }
        if let Some(song) = &self.song {
            params.push(("song", song.as_str()));
        }
        params
    }
}

/// One status sample returned by the progress endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSample {
    /// ID of the active render attempt, assigned once rendering starts.
    #[serde(default)]
    pub cinematic_id: Option<String>,
    /// Public URL of the rendered video, once available.
    #[serde(default)]
    pub url: Option<String>,
    /// Render progress; 1.0 when complete, negative when the project is unknown.
    pub progress: f64,
}

impl StatusSample {
    /// Sentinel sample standing in for an unknown project.
    pub fn not_found() -> Self {
        Self {
            cinematic_id: None,
            url: None,
            progress: -1.0,
        }
    }

    /// Sample for a project whose render has not started yet.
    pub fn pending(progress: f64) -> Self {
        Self {
            cinematic_id: None,
            url: None,
            progress,
        }
    }

    /// Sample for a render in progress.
    pub fn rendering(cinematic_id: impl Into<String>, progress: f64) -> Self {
        Self {
            cinematic_id: Some(cinematic_id.into()),
            url: None,
            progress,
        }
    }

    /// Sample for a finished render.
    pub fn complete(cinematic_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            cinematic_id: Some(cinematic_id.into()),
            url: Some(url.into()),
            progress: 1.0,
        }
    }
}

/// Trait for the remote render service.
///
/// Every call is authenticated by the implementation. Callers never retry;
/// a single `Err` is the final answer for that call.
#[async_trait]
pub trait RenderApi: Send + Sync {
    /// Get the name of this transport (for logging).
    fn name(&self) -> &str;

    /// Create a project and return the video ID assigned by the service.
    async fn create_project(&self, fields: &ProjectFields) -> Result<String, ApiError>;

    /// Request a write-capable URL for uploading the project's media.
    async fn sign_upload(&self, video_id: &str, ext: &str) -> Result<String, ApiError>;

    /// Upload media bytes to a signed target.
    async fn upload_bytes(&self, dest: &Url, data: Vec<u8>) -> Result<(), ApiError>;

    /// Ask the service to copy remote media to a signed target.
    async fn copy_remote(&self, src: &Url, dest: &Url) -> Result<(), ApiError>;

    /// Fetch the current render status of a video.
    async fn fetch_status(
        &self,
        video_id: &str,
        cinematic_id: Option<&str>,
    ) -> Result<StatusSample, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_sample_deserialize_full() {
        let json = r#"{"cinematicId":"c1","url":"https://x/y.mp4","progress":1}"#;
        let sample: StatusSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.cinematic_id.as_deref(), Some("c1"));
        assert_eq!(sample.url.as_deref(), Some("https://x/y.mp4"));
        assert_eq!(sample.progress, 1.0);
    }

    #[test]
    fn test_status_sample_deserialize_nulls_and_missing() {
        let json = r#"{"cinematicId":null,"progress":0}"#;
        let sample: StatusSample = serde_json::from_str(json).unwrap();
        assert!(sample.cinematic_id.is_none());
        assert!(sample.url.is_none());
        assert_eq!(sample.progress, 0.0);
    }

    #[test]
    fn test_status_sample_requires_progress() {
        let json = r#"{"cinematicId":"c1"}"#;
        assert!(serde_json::from_str::<StatusSample>(json).is_err());
    }

    #[test]
    fn test_not_found_sentinel() {
        let sample = StatusSample::not_found();
        assert!(sample.progress < 0.0);
        assert!(sample.cinematic_id.is_none());
        assert!(sample.url.is_none());
    }

    #[test]
    fn test_project_fields_omit_absent() {
        let fields = ProjectFields {
            song: Some("mysong".to_string()),
            artist: None,
        };
        assert_eq!(fields.to_query(), vec![("song", "mysong")]);
        assert!(ProjectFields::default().to_query().is_empty());
    }

    #[test]
    fn test_not_found_signal_only_for_400() {
        let bad_request = ApiError::Http {
            status: 400,
            message: "unknown project".to_string(),
        };
        assert!(bad_request.is_not_found_signal());

        let server_error = ApiError::Http {
            status: 500,
            message: "oops".to_string(),
        };
        assert!(!server_error.is_not_found_signal());
        assert!(!ApiError::Timeout.is_not_found_signal());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
        assert_eq!(ApiError::Timeout.to_string(), "Request timeout");
    }
}
