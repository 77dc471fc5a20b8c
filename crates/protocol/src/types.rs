use serde::{Deserialize, Serialize};

/// One folder or file reported by the backend for a directory.
///
/// Read-only: produced from a listing, never mutated by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDirectoryEntry {
    pub name: String,
    pub is_folder: bool,
}

impl RemoteDirectoryEntry {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    /// Path of this entry below `parent` ("" = storage root).
    pub fn path_in(&self, parent: &str) -> String {
        let parent = parent.trim_matches('/');
        if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{parent}/{}", self.name)
        }
    }
}
