//! Render progress tracking.
//!
//! Every created video gets exactly one [`StatusPoller`], stored in the
//! [`TrackerRegistry`]. A poller checks the render API periodically and moves
//! its video through the status state machine:
//!
//! ```text
//! Unknown -> RenderInProgress(p) -> RenderComplete(url)
//!    \              \
//!     `--------------`-----------> Error(message)
//! ```
//!
//! `RenderComplete` and `Error` are terminal: the poller stops and no further
//! notifications are emitted for that video.

mod poller;
mod registry;
mod types;

pub use poller::{interpret, StatusPoller, TickOutcome, PROJECT_NOT_FOUND};
pub use registry::TrackerRegistry;
pub use types::{PollerSnapshot, VideoStatus};
