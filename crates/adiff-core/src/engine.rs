//! The LCS diff engine.
//!
//! A full `(old + 1) x (new + 1)` table of suffix LCS lengths is filled from
//! the bottom-right corner, then walked forward from `(0, 0)`. On a tie the
//! walk drops the old element (advances `i`) rather than skipping the new
//! one, which fixes the output for inputs with several longest common
//! subsequences.
//!
//! Time and space are `O(old * new)`, sized for UI-scale lists.

use tracing::debug;

use adiff_index::IndexSet;

use crate::diff::ArrayDiff;

/// Diff two sequences using `==`.
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> ArrayDiff {
    diff_by(old, new, |a, b| a == b)
}

/// Diff two sequences using a caller-supplied equality.
///
/// `eq` is always called as `eq(old_element, new_element)`.
pub fn diff_by<T, U, F>(old: &[T], new: &[U], mut eq: F) -> ArrayDiff
where
    F: FnMut(&T, &U) -> bool,
{
    let table = LcsTable::build(old, new, &mut eq);

    let mut common = IndexSet::new();
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if eq(&old[i], &new[j]) {
            common.insert(i);
            i += 1;
            j += 1;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            i += 1;
        } else {
            j += 1;
        }
    }

    let removed = common.complement_within(0..old.len());

    // Re-walk the new sequence against the retained elements in order; any
    // new element that is not the next pending retained one was inserted.
    let mut inserted = IndexSet::new();
    let mut pending = common.iter().peekable();
    for (j, item) in new.iter().enumerate() {
        if matches!(pending.peek(), Some(&i) if eq(&old[i], item)) {
            pending.next();
        } else {
            inserted.insert(j);
        }
    }
    debug_assert!(pending.next().is_none(), "retained element left unmatched");

    debug!(
        old = old.len(),
        new = new.len(),
        common = common.len(),
        removed = removed.len(),
        inserted = inserted.len(),
        "computed array diff"
    );

    ArrayDiff::from_validated(common, removed, inserted)
}

/// Suffix LCS lengths: `get(i, j)` is the LCS length of `old[i..]` and `new[j..]`.
struct LcsTable {
    width: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    fn build<T, U, F>(old: &[T], new: &[U], eq: &mut F) -> Self
    where
        F: FnMut(&T, &U) -> bool,
    {
        let width = new.len() + 1;
        let mut cells = vec![0; (old.len() + 1) * width];

        for i in (0..old.len()).rev() {
            for j in (0..new.len()).rev() {
                cells[i * width + j] = if eq(&old[i], &new[j]) {
                    1 + cells[(i + 1) * width + j + 1]
                } else {
                    cells[(i + 1) * width + j].max(cells[i * width + j + 1])
                };
            }
        }

        Self { width, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }
}
