//! Fixed-size chunking of files for sequential upload.
//!
//! Everything here is synchronous and transport-agnostic: planning which
//! byte ranges make up a file, reading those ranges from disk or memory,
//! and turning acknowledged chunks into integer progress percentages.

mod chunked;
mod progress;
mod types;
mod validation;

pub use chunked::{ChunkReader, ReadSeek};
pub use progress::{chunk_progress, mean_progress};
pub use types::{Chunk, ChunkPlan, ChunkRange};
pub use validation::{normalize_destination, validate_file_name};

/// Chunk size used by the NASPi web client: 5 MiB.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("chunk {index} is outside a plan of {total} chunk(s)")]
    RangeOutOfBounds { index: u64, total: u64 },

    #[error("source ended early: expected {expected} bytes at offset {offset}, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },
}
