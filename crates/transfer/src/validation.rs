use std::path::{Component, Path};

use crate::TransferError;

/// Validates the name a file will have on the server.
///
/// The server joins it directly onto the destination directory, so it
/// must be a single plain component.
///
/// Rejects:
/// - Empty names, `.` and `..`
/// - Names containing `/` or `\`
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidPath("empty file name".into()));
    }
    if name == "." || name == ".." {
        return Err(TransferError::InvalidPath(format!(
            "reserved file name: {name}"
        )));
    }
    if name.contains(['/', '\\']) {
        return Err(TransferError::InvalidPath(format!(
            "file name must not contain separators: {name}"
        )));
    }
    Ok(())
}

/// Normalises a destination directory relative to the storage root.
///
/// Leading and trailing slashes are stripped ("" is the root). Parent
/// directory traversal and Windows prefixes are rejected.
pub fn normalize_destination(path: &str) -> Result<String, TransferError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    for component in Path::new(trimmed).components() {
        match component {
            Component::ParentDir => {
                return Err(TransferError::InvalidPath(format!(
                    "parent directory traversal not allowed: {path}"
                )));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(TransferError::InvalidPath(format!(
                    "absolute path not allowed: {path}"
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(trimmed.to_string())
}
