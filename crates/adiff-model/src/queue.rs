//! A single-worker queue that serializes model updates.
//!
//! Updates are computed and applied on one spawned task, in submission
//! order, so the model and its sink never see two updates at once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use adiff_core::{BasicSection, ChangeSink, NestedDiff};

use crate::error::{ModelError, ModelResult};
use crate::model::LiveModel;

struct Job<T> {
    _slot: PendingSlot,
    sections: Vec<BasicSection<T>>,
    reply: oneshot::Sender<ModelResult<NestedDiff>>,
}

/// One unit of the pending count. Released when its job is dropped, even if
/// the job never runs.
struct PendingSlot(Arc<AtomicUsize>);

impl PendingSlot {
    fn take(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns a [`LiveModel`] and its sink on a background task.
pub struct UpdateQueue<T, S> {
    tx: mpsc::UnboundedSender<Job<T>>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<(LiveModel<T>, S)>,
}

/// Resolves to the diff once an enqueued update has been applied.
#[derive(Debug)]
pub struct PendingUpdate {
    rx: oneshot::Receiver<ModelResult<NestedDiff>>,
}

impl PendingUpdate {
    /// Fails with [`ModelError::WorkerFailed`] if this update panicked, and
    /// with [`ModelError::QueueClosed`] if the worker stopped before reaching it.
    pub async fn applied(self) -> ModelResult<NestedDiff> {
        self.rx.await.map_err(|_| ModelError::QueueClosed)?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "update panicked".to_string()
    }
}

impl<T, S> UpdateQueue<T, S>
where
    T: PartialEq + Clone + Send + 'static,
    S: ChangeSink + Send + 'static,
{
    /// Start the worker. Must be called inside a tokio runtime.
    pub fn spawn(model: LiveModel<T>, sink: S) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job<T>>();

        let worker = tokio::spawn(async move {
            let mut model = model;
            let mut sink = sink;
            while let Some(job) = rx.recv().await {
                let Job {
                    _slot: slot,
                    sections,
                    reply,
                } = job;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| model.update(sections, &mut sink)));
                drop(slot);
                match outcome {
                    Ok(diff) => {
                        if reply.send(Ok(diff)).is_err() {
                            debug!(revision = model.revision(), "update applied after its handle was dropped");
                        }
                    }
                    Err(payload) => {
                        let message = panic_message(&*payload);
                        error!(revision = model.revision(), %message, "update panicked; stopping worker");
                        let _ = reply.send(Err(ModelError::WorkerFailed(message)));
                        // Queued jobs are dropped with the receiver.
                        panic::resume_unwind(payload);
                    }
                }
            }
            (model, sink)
        });

        Self {
            tx,
            pending: Arc::new(AtomicUsize::new(0)),
            worker,
        }
    }

    /// Queue a replacement for the model's sections.
    pub fn enqueue(&self, sections: Vec<BasicSection<T>>) -> ModelResult<PendingUpdate> {
        let (reply, rx) = oneshot::channel();
        let job = Job {
            _slot: PendingSlot::take(&self.pending),
            sections,
            reply,
        };
        if self.tx.send(job).is_err() {
            warn!("update dropped: queue closed");
            return Err(ModelError::QueueClosed);
        }
        Ok(PendingUpdate { rx })
    }

    /// Updates queued but not yet applied.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Stop accepting updates, finish the queued ones, and hand back the
    /// model and sink. Fails with [`ModelError::WorkerFailed`] if an update
    /// panicked.
    pub async fn shutdown(self) -> ModelResult<(LiveModel<T>, S)> {
        drop(self.tx);
        self.worker
            .await
            .map_err(|e| ModelError::WorkerFailed(e.to_string()))
    }
}
