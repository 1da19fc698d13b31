//! A live sectioned model kept in step with its view by nested diffs.
//!
//! [`LiveModel`] holds the sections currently on screen. Each update diffs
//! the current sections against the replacement, reports the batches to a
//! [`ChangeSink`](adiff_core::ChangeSink), and replays the edit onto the
//! held data. [`UpdateQueue`] runs a model on one tokio task so that updates
//! are applied strictly one after another.

pub mod error;
pub mod model;
pub mod queue;

pub use error::{ModelError, ModelResult};
pub use model::LiveModel;
pub use queue::{PendingUpdate, UpdateQueue};
