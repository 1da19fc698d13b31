//! Error types for the diff crate.

use adiff_index::IndexError;

use crate::diff::Side;

/// Errors that can occur when querying or replaying a diff.
///
/// All of these are caller bugs. The plain operations panic with this text;
/// the `try_` operations return it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A translator was handed an index outside its sequence.
    #[error("{side} index {index} out of range for sequence of length {count}")]
    IndexOutOfRange { index: usize, count: usize, side: Side },

    /// A sequence handed to a replay does not have the length the diff was computed for.
    #[error("{side} sequence has length {actual}, diff expects {expected}")]
    LengthMismatch {
        side: Side,
        expected: usize,
        actual: usize,
    },

    /// The index sets of a diff do not describe one old/new transition.
    #[error("inconsistent diff parts: {0}")]
    InconsistentParts(String),

    /// A retained old section has no position in the new sections.
    #[error("retained old section {old_section} has no new section")]
    MissingSection { old_section: usize },

    /// Applying an index set to a sequence failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
