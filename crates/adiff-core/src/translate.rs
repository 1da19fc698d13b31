//! Index translation between the old and new side of an [`ArrayDiff`].
//!
//! Both directions work the same way. First the index is pulled back by the
//! members of its own side's set that sit strictly before it (insertions for
//! a new index, removals for an old one). Then it is pushed forward past the
//! other side's members with an ascending scan: every member at or before
//! the running position bumps it by one, and the scan stops at the first
//! member beyond it. The scan runs over contiguous runs of the set, and a
//! run that starts at or before the position is consumed whole, so the cost
//! is the number of runs up to the result.

use tracing::trace;

use adiff_index::IndexSet;

use crate::diff::{ArrayDiff, Side};
use crate::error::{DiffError, DiffResult};

impl ArrayDiff {
    /// The old index of the element now at `index`, or `None` if it was inserted.
    ///
    /// # Panics
    ///
    /// Panics if `index >= new_count()`.
    pub fn old_index_for_new_index(&self, index: usize) -> Option<usize> {
        match self.try_old_index_for_new_index(index) {
            Ok(result) => result,
            Err(err) => panic!("old_index_for_new_index: {err}"),
        }
    }

    /// Checked form of [`old_index_for_new_index`](Self::old_index_for_new_index).
    pub fn try_old_index_for_new_index(&self, index: usize) -> DiffResult<Option<usize>> {
        check_bounds(index, self.new_count(), Side::New)?;
        if self.inserted_indexes().contains(index) {
            return Ok(None);
        }

        let inserted_before = self.inserted_indexes().count_in(0..index);
        let result = shift_past(self.removed_indexes(), index - inserted_before);
        trace!(
            new = index,
            inserted_before,
            removed_at_or_before = result - (index - inserted_before),
            old = result,
            "new -> old"
        );
        Ok(Some(result))
    }

    /// The new index of the element that was at `index`, or `None` if it was removed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= old_count()`.
    pub fn new_index_for_old_index(&self, index: usize) -> Option<usize> {
        match self.try_new_index_for_old_index(index) {
            Ok(result) => result,
            Err(err) => panic!("new_index_for_old_index: {err}"),
        }
    }

    /// Checked form of [`new_index_for_old_index`](Self::new_index_for_old_index).
    pub fn try_new_index_for_old_index(&self, index: usize) -> DiffResult<Option<usize>> {
        check_bounds(index, self.old_count(), Side::Old)?;
        if self.removed_indexes().contains(index) {
            return Ok(None);
        }

        let removed_before = self.removed_indexes().count_in(0..index);
        let result = shift_past(self.inserted_indexes(), index - removed_before);
        trace!(
            old = index,
            removed_before,
            inserted_at_or_before = result - (index - removed_before),
            new = result,
            "old -> new"
        );
        Ok(Some(result))
    }
}

fn check_bounds(index: usize, count: usize, side: Side) -> DiffResult<()> {
    if index >= count {
        return Err(DiffError::IndexOutOfRange { index, count, side });
    }
    Ok(())
}

/// Push `position` forward once for every member of `set` at or before it.
fn shift_past(set: &IndexSet, mut position: usize) -> usize {
    for run in set.ranges() {
        if run.start > position {
            break;
        }
        position += run.len();
    }
    position
}
