//! Render lifecycle integration tests.
//!
//! These tests drive the public session facade with a mock render API:
//! - Video creation, redirect and automatic tracking
//! - Observer notifications in state-machine order
//! - Polling cadence and render attempt ID stickiness
//! - Terminal states and sharing

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;
use url::Url;

use voialink_core::{
    ApiError, CreateVideoRequest, HostApp, LinkError, RenderObserver, ShareMethod, StatusSample,
    VideoStatus, VoiaLink,
    testing::{
        ApiCall, ApiOperation, MockRenderApi, RecordingHost, RecordingObserver, RenderEvent,
        fixtures,
    },
};

/// Test helper wiring a session to mocks.
struct TestHarness {
    link: VoiaLink,
    api: Arc<MockRenderApi>,
    host: Arc<RecordingHost>,
    observer: Arc<RecordingObserver>,
    _observer_handle: Arc<dyn RenderObserver>,
}

impl TestHarness {
    async fn new() -> Self {
        let api = Arc::new(MockRenderApi::new());
        let host = Arc::new(RecordingHost::new());
        let observer = Arc::new(RecordingObserver::new());
        let observer_handle: Arc<dyn RenderObserver> = observer.clone();

        let link = VoiaLink::new(fixtures::config(), Arc::clone(&host) as Arc<dyn HostApp>)
            .expect("valid config");
        link.register_with_api(api.clone()).await;
        link.set_observer(&observer_handle).await;

        Self {
            link,
            api,
            host,
            observer,
            _observer_handle: observer_handle,
        }
    }

    /// Let `ticks` poll intervals elapse.
    async fn advance(&self, ticks: u64) {
        tokio::time::sleep(Duration::from_millis(
            fixtures::DEFAULT_POLL_INTERVAL_MS * ticks + 1,
        ))
        .await;
    }
}

fn remote_request() -> CreateVideoRequest {
    CreateVideoRequest::new(fixtures::remote_audio_url())
        .with_video_name("mysong")
        .with_screen_name("The Beatles")
}

#[tokio::test(start_paused = true)]
async fn test_create_video_redirects_and_tracks_to_completion() {
    let harness = TestHarness::new().await;
    harness.api.set_project_id("v1").await;
    harness
        .api
        .push_statuses(
            "v1",
            vec![
                StatusSample::pending(0.0),
                StatusSample::rendering("c1", 0.1),
                StatusSample::rendering("c1", 0.3),
                StatusSample::complete("c1", "https://cdn.voia.com/v1.mp4"),
            ],
        )
        .await;

    let video_id = harness.link.create_video(remote_request()).await.unwrap();
    assert_eq!(video_id, "v1");

    let opened = harness.host.opened_urls();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].as_str().contains("campaign_id=v1"));

    // Tracking started with the creation, nothing polled yet
    assert_eq!(
        harness.link.status_for("v1").await.unwrap(),
        VideoStatus::Unknown
    );
    assert_eq!(harness.api.status_request_count("v1").await, 0);

    harness.advance(2).await;
    assert_eq!(
        harness.link.status_for("v1").await.unwrap(),
        VideoStatus::RenderInProgress(0.1)
    );

    harness.advance(3).await;
    let url = Url::parse("https://cdn.voia.com/v1.mp4").unwrap();
    assert_eq!(
        harness.link.status_for("v1").await.unwrap(),
        VideoStatus::RenderComplete(url)
    );
    assert_eq!(
        harness.observer.events_for("v1"),
        vec![
            RenderEvent::started("v1"),
            RenderEvent::progressed("v1", 0.3),
            RenderEvent::complete("v1", "https://cdn.voia.com/v1.mp4"),
        ]
    );

    // No further checks once complete
    assert_eq!(harness.api.status_request_count("v1").await, 4);
    harness.advance(3).await;
    assert_eq!(harness.api.status_request_count("v1").await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_create_video_calls_api_in_order() {
    let harness = TestHarness::new().await;
    harness.api.set_project_id("v1").await;
    harness.api.set_signed_url("https://upload.voia.com/v1.mp3").await;

    harness.link.create_video(remote_request()).await.unwrap();

    let calls = harness.api.calls().await;
    assert_eq!(calls.len(), 3);
    match &calls[0] {
        ApiCall::CreateProject(fields) => {
            assert_eq!(fields.song.as_deref(), Some("mysong"));
            assert_eq!(fields.artist.as_deref(), Some("The Beatles"));
        }
        other => panic!("Expected project creation, got {:?}", other),
    }
    assert_eq!(
        calls[1],
        ApiCall::SignUpload {
            video_id: "v1".to_string(),
            ext: "mp3".to_string(),
        }
    );
    assert_eq!(
        calls[2],
        ApiCall::CopyRemote {
            src: fixtures::remote_audio_url(),
            dest: Url::parse("https://upload.voia.com/v1.mp3").unwrap(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_video_uploads_local_file() {
    let harness = TestHarness::new().await;
    harness.api.set_project_id("v1").await;

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"ID3 fake audio").unwrap();
    let audio = Url::from_file_path(file.path()).unwrap();

    harness
        .link
        .create_video(CreateVideoRequest::new(audio))
        .await
        .unwrap();

    let calls = harness.api.calls().await;
    assert!(calls.iter().any(|c| matches!(
        c,
        ApiCall::UploadBytes { len, .. } if *len == b"ID3 fake audio".len()
    )));
    assert!(!calls.iter().any(|c| matches!(c, ApiCall::CopyRemote { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_failed_creation_has_no_side_effects() {
    let harness = TestHarness::new().await;
    harness
        .api
        .fail_next(
            ApiOperation::SignUpload,
            ApiError::Http {
                status: 500,
                message: "boom".to_string(),
            },
        )
        .await;

    let result = harness.link.create_video(remote_request()).await;
    assert!(matches!(result, Err(LinkError::ApiCallFailed { .. })));

    assert!(harness.host.opened_urls().is_empty());
    assert!(harness.link.tracked_videos().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_status_for_starts_tracking_existing_video() {
    let harness = TestHarness::new().await;
    harness
        .api
        .push_statuses("old", vec![StatusSample::rendering("c7", 0.5)])
        .await;

    assert_eq!(
        harness.link.status_for("old").await.unwrap(),
        VideoStatus::Unknown
    );
    harness.advance(1).await;

    assert_eq!(
        harness.link.status_for("old").await.unwrap(),
        VideoStatus::RenderInProgress(0.5)
    );
    assert_eq!(
        harness.observer.events_for("old"),
        vec![RenderEvent::started("old")]
    );

    harness.advance(1).await;
    assert_eq!(
        harness.api.status_requests("old").await,
        vec![None, Some("c7".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unknown_project_is_terminal_error() {
    let harness = TestHarness::new().await;
    harness
        .api
        .push_status_error(
            "ghost",
            ApiError::Http {
                status: 400,
                message: "no such project".to_string(),
            },
        )
        .await;

    harness.link.status_for("ghost").await.unwrap();
    harness.advance(3).await;

    let snapshot = harness.link.snapshot("ghost").await.unwrap();
    assert!(matches!(snapshot.status, VideoStatus::Error(_)));
    assert!(!snapshot.polling);
    assert_eq!(snapshot.polls, 1);
    assert_eq!(harness.observer.events_for("ghost").len(), 1);
    assert!(harness.observer.events_for("ghost")[0].is_terminal());
}

#[tokio::test(start_paused = true)]
async fn test_share_after_completion() {
    let harness = TestHarness::new().await;
    harness
        .api
        .push_statuses(
            "v1",
            vec![StatusSample::complete("c1", "https://cdn.voia.com/v1.mp4")],
        )
        .await;

    harness.link.status_for("v1").await.unwrap();
    let early = harness.link.share("v1", ShareMethod::System).await;
    assert!(matches!(early, Err(LinkError::VideoNotReady(_))));

    harness.advance(1).await;
    harness
        .link
        .share(
            "v1",
            ShareMethod::Instagram {
                app_id: "123".to_string(),
            },
        )
        .await
        .unwrap();

    let shares = harness.host.shares();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].video_id, "v1");
    assert_eq!(shares[0].public_url.as_str(), "https://cdn.voia.com/v1.mp4");
}

#[tokio::test(start_paused = true)]
async fn test_trackers_are_independent() {
    let harness = TestHarness::new().await;
    harness
        .api
        .push_statuses(
            "a",
            vec![StatusSample::complete("ca", "https://cdn.voia.com/a.mp4")],
        )
        .await;
    harness
        .api
        .push_statuses("b", vec![StatusSample::rendering("cb", 0.2)])
        .await;

    harness.link.status_for("a").await.unwrap();
    harness.link.status_for("b").await.unwrap();
    harness.advance(2).await;

    assert!(harness.link.status_for("a").await.unwrap().is_terminal());
    assert_eq!(
        harness.link.status_for("b").await.unwrap(),
        VideoStatus::RenderInProgress(0.2)
    );
    assert_eq!(harness.api.status_request_count("a").await, 1);
    assert_eq!(harness.api.status_request_count("b").await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_observer_replaced_then_dropped() {
    let harness = TestHarness::new().await;
    harness
        .api
        .push_statuses(
            "v1",
            vec![
                StatusSample::rendering("c1", 0.2),
                StatusSample::rendering("c1", 0.6),
            ],
        )
        .await;

    let replacement = Arc::new(RecordingObserver::new());
    let handle: Arc<dyn RenderObserver> = replacement.clone();
    harness.link.set_observer(&handle).await;

    harness.link.status_for("v1").await.unwrap();
    harness.advance(1).await;

    assert_eq!(
        replacement.events_for("v1"),
        vec![RenderEvent::started("v1")]
    );
    assert!(harness.observer.events().is_empty());

    // The session only holds a weak reference
    drop(handle);
    drop(replacement);
    harness.advance(1).await;

    assert_eq!(
        harness.link.status_for("v1").await.unwrap(),
        VideoStatus::RenderInProgress(0.6)
    );
    assert!(harness.observer.events().is_empty());
}
