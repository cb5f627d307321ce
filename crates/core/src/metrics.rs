//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Render API calls (per operation)
//! - Video creation
//! - Render tracking (status polls, lifecycle events)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Render API Metrics
// =============================================================================

/// Render API requests total.
pub static API_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voia_api_requests_total", "Total render API requests"),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Render API request duration.
pub static API_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "voia_api_request_duration_seconds",
            "Duration of render API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Creation Metrics
// =============================================================================

/// Video creation attempts by result.
pub static VIDEOS_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voia_video_creations_total", "Total video creation attempts"),
        &["result"], // "success", "create_project", "sign_upload", "upload"
    )
    .unwrap()
});

// =============================================================================
// Tracking Metrics
// =============================================================================

/// Progress trackers created.
pub static TRACKERS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "voia_trackers_created_total",
        "Total render progress trackers created",
    )
    .unwrap()
});

/// Status poll ticks by result.
pub static STATUS_POLLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voia_status_polls_total", "Total render status polls"),
        &["result"], // "sample", "not_found", "failed"
    )
    .unwrap()
});

/// Render lifecycle events delivered.
pub static RENDER_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voia_render_events_total", "Total render lifecycle events"),
        &["event"], // "started", "progressed", "completed", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(API_REQUESTS.clone()),
        Box::new(API_REQUEST_DURATION.clone()),
        Box::new(VIDEOS_CREATED.clone()),
        Box::new(TRACKERS_CREATED.clone()),
        Box::new(STATUS_POLLS.clone()),
        Box::new(RENDER_EVENTS.clone()),
    ]
}
