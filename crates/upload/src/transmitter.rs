//! Sequential chunk upload of a single file.

use naspi_protocol::{CancelUploadRequest, ChunkFields};
use naspi_transfer::{
    CHUNK_SIZE, Chunk, ChunkReader, chunk_progress, normalize_destination, validate_file_name,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::NasBackend;
use crate::error::UploadError;
use crate::store::UploadStore;
use crate::types::{PauseOutcome, TaskId, UploadEvent, UploadFile};

/// Uploads one file to one destination directory, chunk by chunk.
///
/// Chunk `n + 1` is never sent before chunk `n` has been acknowledged.
/// Pause and cancel are checked before every chunk; a request already
/// in flight is always allowed to finish.
pub struct ChunkTransmitter<'a, B: NasBackend + ?Sized> {
    backend: &'a B,
    store: &'a UploadStore,
    chunk_size: usize,
    events_tx: Option<&'a mpsc::Sender<UploadEvent>>,
}

impl<'a, B: NasBackend + ?Sized> ChunkTransmitter<'a, B> {
    pub fn new(backend: &'a B, store: &'a UploadStore) -> Self {
        Self {
            backend,
            store,
            chunk_size: CHUNK_SIZE,
            events_tx: None,
        }
    }

    /// Overrides the 5 MiB chunk size (0 keeps the default).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { CHUNK_SIZE } else { chunk_size };
        self
    }

    /// Emits an [`UploadEvent::Progress`] per acknowledged chunk.
    pub fn with_events(mut self, events_tx: Option<&'a mpsc::Sender<UploadEvent>>) -> Self {
        self.events_tx = events_tx;
        self
    }

    /// Sends every chunk of `file` into `destination` ("" = root), reporting
    /// progress for `task` to the store.
    ///
    /// Succeeds once the last chunk is acknowledged. A failed chunk is not
    /// retried.
    pub async fn transmit(
        &self,
        task: TaskId,
        file: &UploadFile,
        destination: &str,
    ) -> Result<(), UploadError> {
        validate_file_name(file.name())?;
        let destination = normalize_destination(destination)?;
        let file_name = file.name().to_string();

        let mut reader = open_reader(file.clone(), self.chunk_size).await?;
        let total_chunks = reader.plan().total_chunks();

        debug!(
            task = %task,
            file = %file_name,
            bytes = file.size(),
            chunks = total_chunks,
            destination = %destination,
            "transmitting file"
        );

        for index in 0..total_chunks {
            self.checkpoint(&file_name, &destination).await?;

            let (returned, chunk) = read_chunk(reader, index).await?;
            reader = returned;
            let chunk = chunk?;

            let fields = ChunkFields {
                filename: file_name.clone(),
                chunk_index: index,
                total_chunks,
                path: destination.clone(),
            };
            if let Err(source) = self.backend.upload_chunk(fields, chunk.data).await {
                warn!(
                    file = %file_name,
                    chunk = index,
                    error = %source,
                    "chunk upload failed"
                );
                return Err(UploadError::ChunkUploadFailed {
                    file_name,
                    chunk_index: index,
                    source,
                });
            }

            let progress = chunk_progress(index, total_chunks);
            self.store.update_progress(task, progress);

            if let Some(tx) = self.events_tx {
                let _ = tx
                    .send(UploadEvent::Progress {
                        task,
                        file_name: file_name.clone(),
                        chunk_index: index,
                        total_chunks,
                        progress,
                        global_progress: self.store.global_progress(),
                    })
                    .await;
            }
        }

        info!(file = %file_name, chunks = total_chunks, "file uploaded");
        Ok(())
    }

    /// Cooperative suspension point before each chunk.
    async fn checkpoint(&self, file_name: &str, destination: &str) -> Result<(), UploadError> {
        if self.store.is_paused() && !self.store.is_cancelled() {
            debug!(file = %file_name, "upload paused");
        }

        match self.store.wait_while_paused().await {
            PauseOutcome::Proceed => Ok(()),
            PauseOutcome::Cancelled => {
                self.request_cleanup(file_name, destination).await;
                info!(file = %file_name, "upload cancelled");
                Err(UploadError::Cancelled {
                    file_name: file_name.to_string(),
                })
            }
        }
    }

    async fn request_cleanup(&self, file_name: &str, destination: &str) {
        let request = CancelUploadRequest {
            filename: file_name.to_string(),
            path: destination.to_string(),
        };
        if let Err(e) = self.backend.cancel_upload(request).await {
            warn!(file = %file_name, error = %e, "cancel cleanup request failed");
        }
    }
}

async fn open_reader(file: UploadFile, chunk_size: usize) -> Result<ChunkReader, UploadError> {
    let reader = tokio::task::spawn_blocking(move || file.open_reader(chunk_size))
        .await
        .map_err(std::io::Error::other)??;
    Ok(reader)
}

/// Reads chunk `index` on the blocking pool, handing the reader back.
async fn read_chunk(
    mut reader: ChunkReader,
    index: u64,
) -> Result<(ChunkReader, Result<Chunk, UploadError>), UploadError> {
    let (reader, chunk) = tokio::task::spawn_blocking(move || {
        let chunk = reader.read_chunk(index);
        (reader, chunk)
    })
    .await
    .map_err(std::io::Error::other)?;
    Ok((reader, chunk.map_err(UploadError::from)))
}
