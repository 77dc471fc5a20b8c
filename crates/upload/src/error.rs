//! Upload error types.

use naspi_protocol::ProtocolError;
use naspi_transfer::TransferError;

/// Errors produced while talking to the NASPi backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Connection-level failure: timeout, DNS, refused connection.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Whether the request never produced an HTTP response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Errors produced by the upload flow.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload cancelled for {file_name}")]
    Cancelled { file_name: String },

    #[error("chunk {chunk_index} of {file_name} failed: {source}")]
    ChunkUploadFailed {
        file_name: String,
        chunk_index: u64,
        #[source]
        source: BackendError,
    },

    #[error("network failure: {0}")]
    Network(#[source] BackendError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("an upload batch is already in progress")]
    BatchInProgress,
}

impl UploadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
