//! NASPi chunked upload flow.
//!
//! Files are split into 5 MiB chunks and sent one at a time to the
//! backend's `/api/upload_chunk` endpoint. A batch of files can be
//! paused, resumed or cancelled between chunks through the shared
//! [`UploadStore`].
//!
//! # Pieces
//!
//! - [`UploadStore`]: shared state (flags, active queue, history,
//!   aggregate progress) with change notification
//! - [`ChunkTransmitter`]: uploads one file, honouring pause and cancel
//! - [`UploadOrchestrator`]: runs a batch and reports per-file outcomes
//! - [`NasBackend`]: the backend endpoints; [`HttpBackend`] talks to a
//!   real server
//! - [`Notifier`]: the single transient notification shown to the user

pub mod backend;
pub mod error;
pub mod http;
pub mod notify;
pub mod orchestrator;
pub mod store;
pub mod transmitter;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types for convenience.
pub use backend::{BackendFuture, NasBackend};
pub use error::{BackendError, UploadError};
pub use http::HttpBackend;
pub use notify::{Notification, NotificationKind, Notifier};
pub use orchestrator::UploadOrchestrator;
pub use store::UploadStore;
pub use transmitter::ChunkTransmitter;
pub use types::{
    BatchReport, BatchStatus, FileOutcome, FileReport, PauseOutcome, TaskId, UploadEvent,
    UploadFile, UploadState, UploadTask,
};
