use std::time::Duration;

/// Base URL of a stock NASPi appliance on the local network.
pub const DEFAULT_SERVER_URL: &str = "http://naspi.local:5000";

/// Appends one chunk to the server-side temporary file (multipart form).
pub const UPLOAD_CHUNK_PATH: &str = "/api/upload_chunk";

/// Discards the server-side temporary file of an unfinished upload (JSON).
pub const CANCEL_UPLOAD_PATH: &str = "/api/cancel_upload";

/// Lists the folders and files of a directory (`?path=`).
pub const LIST_FILES_PATH: &str = "/api/files";

/// Query parameter carrying the directory for [`LIST_FILES_PATH`].
pub const PATH_QUERY: &str = "path";

/// Default timeout for a single request, chunk uploads included.
///
/// A 5 MiB chunk over a slow Wi-Fi link to a Raspberry Pi class device
/// can take tens of seconds.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Multipart field names of a chunk upload request.
pub mod fields {
    /// Raw bytes of the chunk.
    pub const CHUNK: &str = "chunk";
    /// Original file name; the server writes `.<filename>.uploading`.
    pub const FILENAME: &str = "filename";
    /// Zero-based chunk index.
    pub const CHUNK_INDEX: &str = "chunkIndex";
    /// Total number of chunks; the server finalises on the last index.
    pub const TOTAL_CHUNKS: &str = "totalChunks";
    /// Destination directory relative to the storage root ("" = root).
    pub const PATH: &str = "path";
}
