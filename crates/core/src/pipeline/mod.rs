//! Video creation pipeline.
//!
//! This module provides the `CreationPipeline` which chains the render API
//! calls needed to turn a soundtrack into a tracked video:
//! - Project creation (returns the video ID)
//! - Signed upload target
//! - Upload of local audio, or server-side copy of remote audio
//!
//! # Example
//!
//! ```ignore
//! use voialink_core::pipeline::{CreationPipeline, CreateVideoRequest};
//!
//! let request = CreateVideoRequest::new(audio_url)
//!     .with_video_name("mysong")
//!     .with_screen_name("The Beatles");
//! let video_id = pipeline.create_video(&request).await?;
//! ```

mod runner;
mod types;

pub use runner::CreationPipeline;
pub use types::{AudioSource, CreateVideoRequest};
