//! Upload orchestrator for one batch of files.
//!
//! Registers the selected files with the store, hands them one at a time
//! to the chunk transmitter, reports each outcome and refreshes the
//! destination listing once the batch is done.

use naspi_protocol::RemoteDirectoryEntry;
use naspi_transfer::CHUNK_SIZE;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::backend::NasBackend;
use crate::error::UploadError;
use crate::notify::Notifier;
use crate::store::UploadStore;
use crate::transmitter::ChunkTransmitter;
use crate::types::{
    BatchReport, BatchStatus, FileOutcome, FileReport, TaskId, UploadEvent, UploadFile,
};

const EVENT_CAPACITY: usize = 256;

/// Releases the store if a batch is dropped before it finishes.
struct BatchGuard<'a> {
    store: &'a UploadStore,
    armed: bool,
}

impl<'a> BatchGuard<'a> {
    fn new(store: &'a UploadStore) -> Self {
        Self { store, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let dropped = self.store.drain_queue();
            self.store.set_uploading(false);
            warn!(dropped = dropped.len(), "upload batch abandoned");
        }
    }
}

/// Runs upload batches against one backend.
pub struct UploadOrchestrator<B: NasBackend> {
    backend: B,
    store: UploadStore,
    notifier: Notifier,
    chunk_size: usize,
    events_tx: Option<mpsc::Sender<UploadEvent>>,
}

impl<B: NasBackend> UploadOrchestrator<B> {
    pub fn new(backend: B, store: UploadStore) -> Self {
        Self {
            backend,
            store,
            notifier: Notifier::new(),
            chunk_size: CHUNK_SIZE,
            events_tx: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// The shared store; pause, resume and cancel go through it.
    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// Events are only produced once a receiver has been taken, so a
    /// caller that never reads them cannot stall a batch.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        if self.events_tx.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::channel(EVENT_CAPACITY);
        self.events_tx = Some(tx);
        Some(rx)
    }

    /// Fetches the name-sorted listing of `path` ("" = root).
    pub async fn list_directory(
        &self,
        path: &str,
    ) -> Result<Vec<RemoteDirectoryEntry>, UploadError> {
        let listing = self
            .backend
            .list_files(path)
            .await
            .map_err(UploadError::Network)?;
        Ok(listing.into_entries())
    }

    /// Uploads `files` in order into `current_path`.
    ///
    /// A failed file does not stop the batch; a cancellation does. Returns
    /// [`UploadError::BatchInProgress`] without touching any state when
    /// another batch holds the store.
    pub async fn run_batch(
        &self,
        files: Vec<UploadFile>,
        current_path: &str,
    ) -> Result<BatchReport, UploadError> {
        if !self.store.try_begin_batch() {
            warn!("upload requested while another batch is running");
            return Err(UploadError::BatchInProgress);
        }
        let mut guard = BatchGuard::new(&self.store);

        let destination = current_path.to_string();
        let tasks: Vec<(TaskId, UploadFile)> = files
            .into_iter()
            .map(|file| (self.store.add_task(file.name()), file))
            .collect();

        info!(
            files = tasks.len(),
            destination = %destination,
            "upload batch started"
        );

        let mut reports = Vec::with_capacity(tasks.len());
        let mut cancelled = false;
        let mut cancelled_mid_file = false;

        for (task, file) in &tasks {
            if self.store.is_cancelled() {
                cancelled = true;
                break;
            }

            let task = *task;
            let file_name = file.name().to_string();
            self.emit(UploadEvent::FileStarted {
                task,
                file_name: file_name.clone(),
            })
            .await;

            let result = ChunkTransmitter::new(&self.backend, &self.store)
                .with_chunk_size(self.chunk_size)
                .with_events(self.events_tx.as_ref())
                .transmit(task, file, &destination)
                .await;

            let outcome = match result {
                Ok(()) => {
                    self.store.remove_task(task);
                    self.notifier.success(format!("\"{file_name}\" uploaded"));
                    self.emit(UploadEvent::FileCompleted {
                        task,
                        file_name: file_name.clone(),
                    })
                    .await;
                    FileOutcome::Completed
                }
                Err(e) if e.is_cancelled() => {
                    self.notifier
                        .error(format!("Upload cancelled for \"{file_name}\""));
                    self.emit(UploadEvent::FileCancelled {
                        task,
                        file_name: file_name.clone(),
                    })
                    .await;
                    cancelled = true;
                    cancelled_mid_file = true;
                    FileOutcome::Cancelled
                }
                Err(e) => {
                    self.store.remove_task(task);
                    let reason = e.to_string();
                    error!(file = %file_name, error = %reason, "file upload failed");
                    self.notifier
                        .error(format!("Failed to upload \"{file_name}\": {reason}"));
                    self.emit(UploadEvent::FileFailed {
                        task,
                        file_name: file_name.clone(),
                        error: reason.clone(),
                    })
                    .await;
                    FileOutcome::Failed(reason)
                }
            };

            reports.push(FileReport {
                task,
                file_name,
                outcome,
            });
            if cancelled {
                break;
            }
        }

        for (task, file) in &tasks[reports.len()..] {
            reports.push(FileReport {
                task: *task,
                file_name: file.name().to_string(),
                outcome: FileOutcome::Skipped,
            });
        }

        let mut report = BatchReport {
            status: BatchStatus::Completed,
            destination,
            files: reports,
            listing: None,
        };

        guard.disarm();
        if cancelled {
            let dropped = self.store.drain_queue();
            if !cancelled_mid_file {
                self.notifier.info("Upload cancelled");
            }
            self.store.set_uploading(false);
            report.status = BatchStatus::Cancelled;
            info!(
                completed = report.completed(),
                dropped = dropped.len(),
                "upload batch cancelled"
            );
        } else {
            self.store.set_uploading(false);
            if report.failed() > 0 {
                report.status = BatchStatus::PartiallyFailed;
            }
            match self.list_directory(&report.destination).await {
                Ok(entries) => report.listing = Some(entries),
                Err(e) => {
                    warn!(path = %report.destination, error = %e, "failed to refresh listing");
                    self.notifier.error("Error loading files");
                }
            }
            info!(
                completed = report.completed(),
                failed = report.failed(),
                "upload batch finished"
            );
        }

        self.emit(UploadEvent::BatchFinished {
            status: report.status,
        })
        .await;
        Ok(report)
    }

    async fn emit(&self, event: UploadEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event).await;
        }
    }
}
