//! Sequence diffing for list and sectioned-list views.
//!
//! Computes the minimal set of insertions and removals that turns one
//! sequence into another (longest common subsequence, no move detection),
//! translates positions between the two sides of that edit, and composes a
//! section-level diff with per-section item diffs for two-level views.
//!
//! The crate is pure computation: it borrows its inputs, returns immutable
//! values, and logs through `tracing` without installing a subscriber.
//!
//! # Key Types
//!
//! - [`ArrayDiff`] -- Common/removed/inserted indexes of one transition
//! - [`diff`] / [`diff_by`] -- The LCS engine
//! - [`NestedDiff`] / [`diff_nested`] -- Section diff plus per-section item diffs
//! - [`ChangeSink`] -- Receiver of batched view updates in safe order
//!
//! # Example
//!
//! ```
//! use adiff_core::diff;
//!
//! let d = diff(&["a", "b", "c", "d"], &["a", "c", "e"]);
//! assert_eq!(d.removed_indexes().iter().collect::<Vec<_>>(), vec![1, 3]);
//! assert_eq!(d.old_index_for_new_index(1), Some(2));
//! assert_eq!(d.new_index_for_old_index(3), None);
//! ```

pub mod diff;
pub mod engine;
pub mod error;
pub mod nested;
pub mod sink;
pub mod translate;

pub use adiff_index::{IndexPath, IndexSet, Order};
pub use diff::{ArrayDiff, Side};
pub use engine::{diff, diff_by};
pub use error::{DiffError, DiffResult};
pub use nested::{diff_nested, diff_nested_by, BasicSection, NestedDiff, Section, SectionUpdate};
pub use sink::{Change, ChangeSink};
