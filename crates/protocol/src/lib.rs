//! Wire types for the NASPi REST file API.
//!
//! Only the endpoints the upload client depends on are modelled here:
//! chunk upload, upload cancellation and directory listing.

pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{CancelUploadRequest, ChunkFields, ListFilesResponse};
pub use types::RemoteDirectoryEntry;

/// Errors produced while decoding backend payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend reported an error: {0}")]
    Backend(String),
}
