//! In-memory backend used by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use naspi_protocol::{CancelUploadRequest, ChunkFields, ListFilesResponse};

use crate::backend::{BackendFuture, NasBackend};
use crate::error::BackendError;

pub(crate) struct RecordedChunk {
    pub fields: ChunkFields,
    pub len: usize,
    pub data: Vec<u8>,
}

type ChunkHook = Box<dyn Fn(&ChunkFields) + Send + Sync>;

/// Records every request; can be told to fail specific chunks.
pub(crate) struct MockBackend {
    chunks: Mutex<Vec<RecordedChunk>>,
    cancels: Mutex<Vec<CancelUploadRequest>>,
    listed: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail_at: Vec<(String, u64)>,
    fail_cancel: bool,
    fail_listing: bool,
    listing: ListFilesResponse,
    on_chunk: Option<ChunkHook>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            cancels: Mutex::new(Vec::new()),
            listed: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail_at: Vec::new(),
            fail_cancel: false,
            fail_listing: false,
            listing: ListFilesResponse::default(),
            on_chunk: None,
        }
    }

    /// Answers 500 for chunk `index` of `file_name`.
    pub fn fail_at(mut self, file_name: &str, index: u64) -> Self {
        self.fail_at.push((file_name.to_string(), index));
        self
    }

    pub fn fail_cancel(mut self) -> Self {
        self.fail_cancel = true;
        self
    }

    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn with_listing(mut self, listing: ListFilesResponse) -> Self {
        self.listing = listing;
        self
    }

    /// Runs `hook` after each accepted chunk, before the response returns.
    pub fn on_chunk(mut self, hook: impl Fn(&ChunkFields) + Send + Sync + 'static) -> Self {
        self.on_chunk = Some(Box::new(hook));
        self
    }

    pub fn chunks(&self) -> Vec<RecordedChunk> {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .map(|c| RecordedChunk {
                fields: c.fields.clone(),
                len: c.len,
                data: c.data.clone(),
            })
            .collect()
    }

    /// Accepted chunks of `file_name`, concatenated in arrival order.
    pub fn assembled(&self, file_name: &str) -> Vec<u8> {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.fields.filename == file_name)
            .flat_map(|c| c.data.iter().copied())
            .collect()
    }

    /// File names with at least one accepted chunk, in first-seen order.
    pub fn files_seen(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for c in self.chunks.lock().unwrap().iter() {
            if !names.contains(&c.fields.filename) {
                names.push(c.fields.filename.clone());
            }
        }
        names
    }

    pub fn cancels(&self) -> Vec<CancelUploadRequest> {
        self.cancels.lock().unwrap().clone()
    }

    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    /// Chunk requests received, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl NasBackend for MockBackend {
    fn upload_chunk(&self, fields: ChunkFields, data: Vec<u8>) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let fail = self
                .fail_at
                .iter()
                .any(|(name, index)| *name == fields.filename && *index == fields.chunk_index);
            if fail {
                return Err(BackendError::Status {
                    status: 500,
                    message: format!("chunk {} rejected", fields.chunk_index),
                });
            }

            self.chunks.lock().unwrap().push(RecordedChunk {
                fields: fields.clone(),
                len: data.len(),
                data,
            });
            if let Some(hook) = &self.on_chunk {
                hook(&fields);
            }
            Ok(())
        })
    }

    fn cancel_upload(&self, request: CancelUploadRequest) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            self.cancels.lock().unwrap().push(request);
            if self.fail_cancel {
                return Err(BackendError::Status {
                    status: 500,
                    message: "cleanup failed".into(),
                });
            }
            Ok(())
        })
    }

    fn list_files<'a>(&'a self, path: &'a str) -> BackendFuture<'a, ListFilesResponse> {
        Box::pin(async move {
            self.listed.lock().unwrap().push(path.to_string());
            if self.fail_listing {
                return Err(BackendError::Status {
                    status: 404,
                    message: "Directorio no encontrado".into(),
                });
            }
            Ok(self.listing.clone())
        })
    }
}
