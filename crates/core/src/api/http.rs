//! HTTP render API implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client, RequestBuilder, Response};
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::metrics;

use super::{ApiError, ProjectFields, RenderApi, StatusSample};

/// Render API client speaking the Voia HTTP API.
pub struct HttpRenderApi {
    client: Client,
    base_url: String,
    secret: String,
}

impl HttpRenderApi {
    /// Create a new client authenticated with the given client secret.
    pub fn new(config: &ApiConfig, secret: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret: secret.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn bearer(&self) -> String {
        format!("bearer {}", self.secret)
    }

    /// Send an authenticated request and fail on non-2xx responses.
    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let started = Instant::now();
        let result = request.header(AUTHORIZATION, self.bearer()).send().await;
        metrics::API_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Http {
                    status,
                    message: message.chars().take(200).collect(),
                })
            }
            Err(e) => Err(ApiError::from(e)),
        };

        let label = if outcome.is_ok() { "success" } else { "error" };
        metrics::API_REQUESTS
            .with_label_values(&[operation, label])
            .inc();

        if let Err(e) = &outcome {
            warn!("Render API {} failed: {}", operation, e);
        }
        outcome
    }
}

#[async_trait]
impl RenderApi for HttpRenderApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn create_project(&self, fields: &ProjectFields) -> Result<String, ApiError> {
        debug!("Creating project: {:?}", fields);
        let request = self
            .client
            .post(self.endpoint("project"))
            .query(&fields.to_query());

        let response = self.send("create_project", request).await?;
        Ok(response.text().await?)
    }

    async fn sign_upload(&self, video_id: &str, ext: &str) -> Result<String, ApiError> {
        let request = self
            .client
            .get(self.endpoint("signurl"))
            .query(&[("videoid", video_id), ("ext", ext)]);

        let response = self.send("sign_upload", request).await?;
        Ok(response.text().await?)
    }

    async fn upload_bytes(&self, dest: &Url, data: Vec<u8>) -> Result<(), ApiError> {
        debug!("Uploading {} bytes to {}", data.len(), dest);
        let part = multipart::Part::bytes(data)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")?;
        let form = multipart::Form::new().part("key", part);

        let request = self.client.put(dest.clone()).multipart(form);
        self.send("upload_bytes", request).await?;
        Ok(())
    }

    async fn copy_remote(&self, src: &Url, dest: &Url) -> Result<(), ApiError> {
        debug!("Copying audio from {} to {}", src, dest);
        let request = self
            .client
            .post(self.endpoint("copyaudio"))
            .query(&[("src", src.as_str()), ("dest", dest.as_str())]);

        self.send("copy_remote", request).await?;
        Ok(())
    }

    async fn fetch_status(
        &self,
        video_id: &str,
        cinematic_id: Option<&str>,
    ) -> Result<StatusSample, ApiError> {
        let mut request = self
            .client
            .get(self.endpoint("progress"))
            .query(&[("project", video_id)]);
        if let Some(cinematic) = cinematic_id {
            request = request.query(&[("cinematic", cinematic)]);
        }

        let response = self.send("fetch_status", request).await?;
        response
            .json::<StatusSample>()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse status response: {}", e)))
    }
}
