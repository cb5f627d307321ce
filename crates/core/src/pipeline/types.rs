//! Types for the video creation pipeline.

use std::path::PathBuf;

use url::Url;

use crate::api::ProjectFields;

/// Where the soundtrack comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// A file on the local filesystem, uploaded by the client.
    LocalFile(PathBuf),
    /// A remote file, copied server-side without passing through the client.
    Remote(Url),
}

impl AudioSource {
    /// Classify a URL: `file://` URLs are local, everything else is remote.
    pub fn from_url(url: &Url) -> Self {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .unwrap_or_else(|_| PathBuf::from(url.path()));
            AudioSource::LocalFile(path)
        } else {
            AudioSource::Remote(url.clone())
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, AudioSource::LocalFile(_))
    }
}

/// Request to create a new video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVideoRequest {
    /// Soundtrack URL. `file://`, `http://` and `https://` are supported.
    pub audio: Url,
    /// Name embedded on the video, e.g. the song name.
    pub video_name: Option<String>,
    /// User screen name embedded on the video.
    pub screen_name: Option<String>,
}

impl CreateVideoRequest {
    /// Create a request with no metadata.
    pub fn new(audio: Url) -> Self {
        Self {
            audio,
            video_name: None,
            screen_name: None,
        }
    }

    /// Set the video name.
    pub fn with_video_name(mut self, name: impl Into<String>) -> Self {
        self.video_name = Some(name.into());
        self
    }

    /// Set the screen name.
    pub fn with_screen_name(mut self, name: impl Into<String>) -> Self {
        self.screen_name = Some(name.into());
        self
    }

    pub fn source(&self) -> AudioSource {
        AudioSource::from_url(&self.audio)
    }

    /// Project metadata: the video name is the song, the screen name the artist.
    pub fn project_fields(&self) -> ProjectFields {
        ProjectFields {
            song: self.video_name.clone(),
            artist: self.screen_name.clone(),
        }
    }
}
