pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod session;
pub mod testing;
pub mod tracker;

pub use api::{ApiError, HttpRenderApi, ProjectFields, RenderApi, StatusSample};
pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, Config, ConfigError,
    TrackerConfig,
};
pub use error::{LinkError, PipelineStep};
pub use host::{HostApp, LoggingHost, ShareMethod};
pub use observer::RenderObserver;
pub use pipeline::{AudioSource, CreateVideoRequest, CreationPipeline};
pub use session::VoiaLink;
pub use tracker::{PollerSnapshot, StatusPoller, TrackerRegistry, VideoStatus};
