//! The flat diff value: which old elements stay, which go, which new ones arrive.

use std::fmt;

use serde::{Deserialize, Serialize};

use adiff_index::IndexSet;

use crate::error::{DiffError, DiffResult};

/// Which sequence of a transition an index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// The edit that turns one sequence into another, as insertions and removals.
///
/// Moves are not represented: an element that changes position relative to
/// the others shows up as a removal plus an insertion.
///
/// # Invariants
///
/// - `common_indexes` and `removed_indexes` partition `0..old_count`.
/// - `inserted_indexes` lies within `0..new_count`.
/// - `old_count = |common| + |removed|`, `new_count = |common| + |inserted|`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArrayDiff")]
pub struct ArrayDiff {
    /// Old indexes of the elements that were kept.
    common_indexes: IndexSet,
    /// Old indexes of the elements that were removed.
    removed_indexes: IndexSet,
    /// New indexes of the elements that were inserted.
    inserted_indexes: IndexSet,
}

#[derive(Deserialize)]
struct RawArrayDiff {
    common_indexes: IndexSet,
    removed_indexes: IndexSet,
    inserted_indexes: IndexSet,
}

impl TryFrom<RawArrayDiff> for ArrayDiff {
    type Error = DiffError;

    fn try_from(raw: RawArrayDiff) -> DiffResult<Self> {
        ArrayDiff::from_parts(raw.common_indexes, raw.removed_indexes, raw.inserted_indexes)
    }
}

impl ArrayDiff {
    /// Build a diff from its three index sets, checking the invariants.
    pub fn from_parts(
        common_indexes: IndexSet,
        removed_indexes: IndexSet,
        inserted_indexes: IndexSet,
    ) -> DiffResult<Self> {
        let old_count = common_indexes.len() + removed_indexes.len();
        let new_count = common_indexes.len() + inserted_indexes.len();

        if common_indexes.last().is_some_and(|i| i >= old_count)
            || removed_indexes.last().is_some_and(|i| i >= old_count)
        {
            return Err(DiffError::InconsistentParts(format!(
                "old indexes exceed old count {old_count}"
            )));
        }
        if let Some(shared) = common_indexes.iter().find(|i| removed_indexes.contains(*i)) {
            return Err(DiffError::InconsistentParts(format!(
                "old index {shared} is both common and removed"
            )));
        }
        if inserted_indexes.last().is_some_and(|i| i >= new_count) {
            return Err(DiffError::InconsistentParts(format!(
                "inserted indexes exceed new count {new_count}"
            )));
        }

        Ok(Self::from_validated(common_indexes, removed_indexes, inserted_indexes))
    }

    pub(crate) fn from_validated(
        common_indexes: IndexSet,
        removed_indexes: IndexSet,
        inserted_indexes: IndexSet,
    ) -> Self {
        debug_assert_eq!(
            common_indexes.len() + removed_indexes.len(),
            common_indexes
                .last()
                .max(removed_indexes.last())
                .map_or(0, |i| i + 1)
        );
        Self {
            common_indexes,
            removed_indexes,
            inserted_indexes,
        }
    }

    /// Old indexes of the elements that were kept, ascending.
    pub fn common_indexes(&self) -> &IndexSet {
        &self.common_indexes
    }

    /// Old indexes of the elements that were removed.
    pub fn removed_indexes(&self) -> &IndexSet {
        &self.removed_indexes
    }

    /// New indexes of the elements that were inserted.
    pub fn inserted_indexes(&self) -> &IndexSet {
        &self.inserted_indexes
    }

    /// Length of the old sequence.
    pub fn old_count(&self) -> usize {
        self.common_indexes.len() + self.removed_indexes.len()
    }

    /// Length of the new sequence.
    pub fn new_count(&self) -> usize {
        self.common_indexes.len() + self.inserted_indexes.len()
    }

    /// Returns `true` if nothing was removed or inserted.
    pub fn is_empty(&self) -> bool {
        self.removed_indexes.is_empty() && self.inserted_indexes.is_empty()
    }

    /// Consume the diff into `(common, removed, inserted)`.
    pub fn into_parts(self) -> (IndexSet, IndexSet, IndexSet) {
        (self.common_indexes, self.removed_indexes, self.inserted_indexes)
    }

    // ---------------------------------------------------------------
    // Replay
    // ---------------------------------------------------------------

    /// Edit `old` in place into `new`: drop the removed elements, then
    /// insert clones of the inserted ones. Retained elements are the ones
    /// already in `old`.
    ///
    /// # Panics
    ///
    /// Panics if either sequence does not have the length this diff was
    /// computed for.
    pub fn apply<T: Clone>(&self, old: &mut Vec<T>, new: &[T]) {
        if let Err(err) = self.try_apply(old, new) {
            panic!("ArrayDiff::apply: {err}");
        }
    }

    /// Checked form of [`apply`](Self::apply). `old` is untouched on error.
    pub fn try_apply<T: Clone>(&self, old: &mut Vec<T>, new: &[T]) -> DiffResult<()> {
        self.check_lengths(old.len(), new.len())?;
        let inserted = self.inserted_indexes.try_select(new)?;
        self.removed_indexes.try_remove_from(old)?;
        self.inserted_indexes.try_insert_into(old, inserted)?;
        Ok(())
    }

    pub(crate) fn check_lengths(&self, old_len: usize, new_len: usize) -> DiffResult<()> {
        if old_len != self.old_count() {
            return Err(DiffError::LengthMismatch {
                side: Side::Old,
                expected: self.old_count(),
                actual: old_len,
            });
        }
        if new_len != self.new_count() {
            return Err(DiffError::LengthMismatch {
                side: Side::New,
                expected: self.new_count(),
                actual: new_len,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ArrayDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "common {} removed {} inserted {}",
            self.common_indexes, self.removed_indexes, self.inserted_indexes
        )
    }
}
