//! Data types for the upload flow.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use naspi_protocol::RemoteDirectoryEntry;
use naspi_transfer::{ChunkReader, TransferError};

use crate::error::UploadError;

/// Synthetic identifier of one file's upload within the store.
///
/// Tasks are keyed by id rather than file name, so two selected files
/// that share a name never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Progress of one file's upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub id: TaskId,
    pub file_name: String,
    /// Integer percentage, 0–100.
    pub progress: u8,
}

/// Snapshot of the upload coordination state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    /// A batch is in flight.
    pub uploading: bool,
    /// The user asked to pause; honoured before the next chunk.
    pub paused: bool,
    /// The user asked to cancel the whole batch.
    pub cancelled: bool,
    /// Files still pending or in flight, in selection order.
    pub queue: Vec<UploadTask>,
    /// Every task added in the current batch.
    pub history: Vec<UploadTask>,
    /// `floor(mean(progress over history))`.
    pub global_progress: u8,
}

/// How a wait on the pause flag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// Not paused (any more); the next chunk may be sent.
    Proceed,
    /// Cancellation was requested.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Upload sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file selected for upload: its server-side name, size and bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    size: u64,
    source: FileSource,
}

impl UploadFile {
    /// Uses a local file; the server-side name is the file's own name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(TransferError::InvalidPath(format!(
                "not a regular file: {}",
                path.display()
            ))
            .into());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TransferError::InvalidPath(path.display().to_string()))?;
        Ok(Self {
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Uses an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Arc<[u8]> = Arc::from(data.into());
        Self {
            name: name.into(),
            size: data.len() as u64,
            source: FileSource::Memory(data),
        }
    }

    /// Overrides the name the file gets on the server.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opens a chunk reader over the file (blocking for disk files).
    pub(crate) fn open_reader(&self, chunk_size: usize) -> Result<ChunkReader, TransferError> {
        match &self.source {
            // Planned from the size at open time, not at selection.
            FileSource::Path(path) => ChunkReader::open(path, chunk_size),
            FileSource::Memory(data) => Ok(ChunkReader::new(
                Box::new(Cursor::new(Arc::clone(data))),
                self.size,
                chunk_size,
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Batch results
// ---------------------------------------------------------------------------

/// Final state of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Completed,
    Failed(String),
    /// Cancellation was observed while this file was being sent.
    Cancelled,
    /// Never attempted because the batch had been cancelled.
    Skipped,
}

/// Per-file entry of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub task: TaskId,
    pub file_name: String,
    pub outcome: FileOutcome,
}

/// Terminal state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every file uploaded.
    Completed,
    /// Ran to the end, but at least one file failed.
    PartiallyFailed,
    /// Stopped early on user cancellation.
    Cancelled,
}

/// Result of one call to [`crate::UploadOrchestrator::run_batch`].
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub status: BatchStatus,
    /// Destination directory captured when the batch started.
    pub destination: String,
    /// One entry per selected file, in selection order.
    pub files: Vec<FileReport>,
    /// Refreshed listing of `destination`; `None` when cancelled or when
    /// the refresh failed.
    pub listing: Option<Vec<RemoteDirectoryEntry>>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Completed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    /// Files cancelled mid-transfer or skipped.
    pub fn not_uploaded(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Cancelled | FileOutcome::Skipped))
    }
}

/// Progress event emitted during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    FileStarted {
        task: TaskId,
        file_name: String,
    },
    /// A chunk was acknowledged.
    Progress {
        task: TaskId,
        file_name: String,
        chunk_index: u64,
        total_chunks: u64,
        progress: u8,
        global_progress: u8,
    },
    FileCompleted {
        task: TaskId,
        file_name: String,
    },
    FileFailed {
        task: TaskId,
        file_name: String,
        error: String,
    },
    FileCancelled {
        task: TaskId,
        file_name: String,
    },
    BatchFinished {
        status: BatchStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_reader_matches() {
        let file = UploadFile::from_bytes("a.bin", b"0123456789".to_vec());
        assert_eq!(file.size(), 10);
        let mut reader = file.open_reader(4).unwrap();
        assert_eq!(reader.plan().total_chunks(), 3);
        assert_eq!(&reader.read_chunk(2).unwrap().data, b"89");
    }

    #[test]
    fn from_path_uses_file_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let file = UploadFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.size(), 5);
    }

    #[test]
    fn path_reader_plans_from_size_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, b"12345").unwrap();
        let file = UploadFile::from_path(&path).unwrap();
        std::fs::write(&path, b"123456789").unwrap();

        let mut reader = file.open_reader(4).unwrap();
        assert_eq!(reader.plan().total_chunks(), 3);
        assert_eq!(&reader.read_chunk(2).unwrap().data, b"9");
    }

    #[test]
    fn from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadFile::from_path(dir.path());
        assert!(matches!(result, Err(UploadError::Transfer(_))));
    }

    #[test]
    fn with_name_overrides() {
        let file = UploadFile::from_bytes("a", Vec::new()).with_name("b");
        assert_eq!(file.name(), "b");
    }

    #[test]
    fn report_counts() {
        let report = BatchReport {
            status: BatchStatus::Cancelled,
            destination: String::new(),
            files: vec![
                FileReport {
                    task: TaskId(0),
                    file_name: "a".into(),
                    outcome: FileOutcome::Completed,
                },
                FileReport {
                    task: TaskId(1),
                    file_name: "b".into(),
                    outcome: FileOutcome::Failed("boom".into()),
                },
                FileReport {
                    task: TaskId(2),
                    file_name: "c".into(),
                    outcome: FileOutcome::Cancelled,
                },
                FileReport {
                    task: TaskId(3),
                    file_name: "d".into(),
                    outcome: FileOutcome::Skipped,
                },
            ],
            listing: None,
        };
        assert_eq!(report.completed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.not_uploaded(), 2);
    }
}
