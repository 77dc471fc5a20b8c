//! Upload coordination store.
//!
//! Single source of truth for in-progress uploads, shared by the
//! orchestrator, the chunk transmitter and any progress display.
//! The state lives in a `watch` channel: every mutator is one atomic
//! `send_modify`/`send_if_modified`, and subscribers wake on each change.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use naspi_transfer::mean_progress;
use tokio::sync::watch;

use crate::types::{PauseOutcome, TaskId, UploadState, UploadTask};

/// Cloneable handle to the shared upload state.
///
/// The store never rejects a call; callers keep arguments consistent.
#[derive(Clone)]
pub struct UploadStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<UploadState>,
    next_id: AtomicU64,
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UploadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStore")
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl UploadStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            inner: Arc::new(StoreInner {
                state,
                next_id: AtomicU64::new(0),
            }),
        }
    }

    // -- flags --

    /// Marks whether a batch is in flight.
    pub fn set_uploading(&self, uploading: bool) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.uploading != uploading;
            s.uploading = uploading;
            changed
        });
    }

    /// Requests a pause; takes effect before the next chunk is sent.
    pub fn pause(&self) {
        self.inner.state.send_if_modified(|s| {
            let changed = !s.paused;
            s.paused = true;
            changed
        });
    }

    pub fn resume(&self) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.paused;
            s.paused = false;
            changed
        });
    }

    /// Requests cancellation of the whole batch.
    ///
    /// Also clears `paused` so a paused transmitter wakes up and observes it.
    pub fn cancel(&self) {
        self.inner.state.send_if_modified(|s| {
            let changed = !s.cancelled || s.paused;
            s.cancelled = true;
            s.paused = false;
            changed
        });
    }

    // -- tasks --

    /// Appends a zero-progress task to the queue and history.
    pub fn add_task(&self, file_name: impl Into<String>) -> TaskId {
        let id = TaskId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let task = UploadTask {
            id,
            file_name: file_name.into(),
            progress: 0,
        };
        self.inner.state.send_modify(|s| {
            s.queue.push(task.clone());
            s.history.push(task);
            s.global_progress = global_progress(&s.history);
        });
        id
    }

    /// Puts a fresh zero-progress entry for a task already in history back
    /// on the queue. History is left as is.
    ///
    /// Returns `false` if the task is unknown or already queued.
    pub fn requeue_task(&self, id: TaskId) -> bool {
        self.inner.state.send_if_modified(|s| {
            if s.queue.iter().any(|t| t.id == id) {
                return false;
            }
            let Some(known) = s.history.iter().find(|t| t.id == id) else {
                return false;
            };
            let fresh = UploadTask {
                progress: 0,
                ..known.clone()
            };
            s.queue.push(fresh);
            true
        })
    }

    /// Sets a task's progress in the queue and history.
    ///
    /// Values above 100 are capped and lower values than the current one
    /// are ignored, so progress never regresses.
    pub fn update_progress(&self, id: TaskId, progress: u8) {
        let progress = progress.min(100);
        self.inner.state.send_if_modified(|s| {
            let mut changed = false;
            for task in s.queue.iter_mut().chain(s.history.iter_mut()) {
                if task.id == id && progress > task.progress {
                    task.progress = progress;
                    changed = true;
                }
            }
            if changed {
                s.global_progress = global_progress(&s.history);
            }
            changed
        });
    }

    /// Removes a task from the queue only; its history entry stays.
    pub fn remove_task(&self, id: TaskId) -> Option<UploadTask> {
        let mut removed = None;
        self.inner.state.send_if_modified(|s| {
            let pos = s.queue.iter().position(|t| t.id == id);
            removed = pos.map(|p| s.queue.remove(p));
            removed.is_some()
        });
        removed
    }

    /// Empties the queue, returning what was left in it.
    pub fn drain_queue(&self) -> Vec<UploadTask> {
        let mut drained = Vec::new();
        self.inner.state.send_if_modified(|s| {
            drained = std::mem::take(&mut s.queue);
            !drained.is_empty()
        });
        drained
    }

    /// Claims the store for a new batch.
    ///
    /// Fails if a batch is already uploading. Otherwise clears flags, queue
    /// and history and sets `uploading`, in one mutation.
    pub fn try_begin_batch(&self) -> bool {
        self.inner.state.send_if_modified(|s| {
            if s.uploading {
                return false;
            }
            *s = UploadState {
                uploading: true,
                ..UploadState::default()
            };
            true
        })
    }

    /// Returns every field to its initial value.
    pub fn reset(&self) {
        self.inner.state.send_replace(UploadState::default());
    }

    // -- readers --

    pub fn snapshot(&self) -> UploadState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.inner.state.subscribe()
    }

    pub fn is_uploading(&self) -> bool {
        self.inner.state.borrow().uploading
    }

    pub fn is_paused(&self) -> bool {
        self.inner.state.borrow().paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.state.borrow().cancelled
    }

    pub fn global_progress(&self) -> u8 {
        self.inner.state.borrow().global_progress
    }

    /// History entry of a task.
    pub fn task(&self, id: TaskId) -> Option<UploadTask> {
        self.inner
            .state
            .borrow()
            .history
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Suspends while paused.
    ///
    /// Resolves immediately when not paused. Wakes on the resume or cancel
    /// mutation itself; there is no polling.
    pub async fn wait_while_paused(&self) -> PauseOutcome {
        let mut rx = self.inner.state.subscribe();
        let cancelled = match rx.wait_for(|s| !s.paused || s.cancelled).await {
            Ok(state) => state.cancelled,
            // The sender lives as long as `self`.
            Err(_) => false,
        };
        if cancelled {
            PauseOutcome::Cancelled
        } else {
            PauseOutcome::Proceed
        }
    }
}

fn global_progress(history: &[UploadTask]) -> u8 {
    mean_progress(history.iter().map(|t| t.progress))
}
