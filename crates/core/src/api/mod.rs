//! Render API abstraction.
//!
//! This module provides a `RenderApi` trait for the remote render service
//! and an HTTP implementation of it.

mod http;
mod types;

pub use http::HttpRenderApi;
pub use types::*;
