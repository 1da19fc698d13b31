use thiserror::Error;

/// Errors produced by the live model and its update queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The update worker has stopped and accepts no more work.
    #[error("update queue is closed")]
    QueueClosed,

    /// The update worker panicked or was cancelled.
    #[error("update worker failed: {0}")]
    WorkerFailed(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
