//! Error types for index-set operations.

use thiserror::Error;

/// Errors produced when an index set is built or applied to a sequence.
///
/// The bulk mutators treat these as precondition violations and panic with
/// the error text; the `try_` variants hand them back instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The number of indexes does not match the number of elements to insert.
    #[error("index count mismatch: {indexes} indexes for {elements} elements")]
    CountMismatch { indexes: usize, elements: usize },

    /// An index points past the end of the target sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// `usize::MAX` has no half-open range to live in.
    #[error("index {index} is too large to store")]
    TooLarge { index: usize },
}

/// Convenience alias for index-set results.
pub type IndexResult<T> = Result<T, IndexError>;
