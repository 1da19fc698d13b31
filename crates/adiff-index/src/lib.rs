//! Ordered integer index sets for the ArrayDiff toolkit.
//!
//! An [`IndexSet`] names positions in a sequence. Diffs are expressed as
//! index sets, and the same sets drive the bulk edits that replay a diff
//! against a `Vec`.
//!
//! # Key Types
//!
//! - [`IndexSet`] -- Sorted, coalesced set of `usize` with range counting
//! - [`Order`] -- Ascending/descending enumeration for safe batch updates
//! - [`IndexPath`] -- `(section, item)` position in a two-level sequence
//! - [`IndexError`] -- Precondition failures of the bulk edits

pub mod apply;
pub mod error;
pub mod path;
pub mod set;

pub use error::{IndexError, IndexResult};
pub use path::IndexPath;
pub use set::{IndexSet, Iter, Order, Ordered, Ranges};
