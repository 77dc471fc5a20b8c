use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::constants::fields;
use crate::types::RemoteDirectoryEntry;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Text fields sent alongside the raw bytes of one chunk.
///
/// The bytes themselves travel as the `chunk` file part; these values
/// become the remaining form fields in [`ChunkFields::form_fields`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFields {
    pub filename: String,
    pub chunk_index: u64,
    pub total_chunks: u64,
    pub path: String,
}

impl ChunkFields {
    /// Returns `(name, value)` pairs for the non-binary form fields.
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            (fields::FILENAME, self.filename.clone()),
            (fields::CHUNK_INDEX, self.chunk_index.to_string()),
            (fields::TOTAL_CHUNKS, self.total_chunks.to_string()),
            (fields::PATH, self.path.clone()),
        ]
    }

    /// Whether the server will finalise the file after this chunk.
    pub fn is_last(&self) -> bool {
        self.chunk_index + 1 == self.total_chunks
    }
}

/// Asks the server to drop the temporary file of an unfinished upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelUploadRequest {
    pub filename: String,
    #[serde(default)]
    pub path: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Body of `GET /api/files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFilesResponse {
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ListFilesResponse {
    /// Decodes a listing body, surfacing an `{"error": ...}` body as
    /// [`ProtocolError::Backend`].
    pub fn from_slice(body: &[u8]) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ProtocolError::Backend(error.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Merges folders and files into one name-sorted listing.
    ///
    /// Names compare case-insensitively; names equal apart from case fall
    /// back to their raw order.
    pub fn into_entries(self) -> Vec<RemoteDirectoryEntry> {
        let mut entries: Vec<RemoteDirectoryEntry> = self
            .folders
            .into_iter()
            .map(RemoteDirectoryEntry::folder)
            .chain(self.files.into_iter().map(RemoteDirectoryEntry::file))
            .collect();
        entries.sort_by_cached_key(|e| (e.name.to_lowercase(), e.name.clone()));
        entries
    }
}

/// Error body returned by the backend on 4xx/5xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
