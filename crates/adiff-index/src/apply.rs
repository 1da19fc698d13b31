//! Bulk edits of a `Vec` driven by an [`IndexSet`].
//!
//! Removal walks the contiguous runs from the back so that each drained run
//! leaves the positions of the runs still to come untouched. Insertion walks
//! the runs from the front so that each insert shifts later targets into
//! exactly the positions the set names.
//!
//! Both mutators validate everything before the first edit: a failing call
//! leaves the sequence as it was.

use crate::error::{IndexError, IndexResult};
use crate::set::IndexSet;

impl IndexSet {
    /// Remove the elements of `seq` at every position in this set.
    ///
    /// # Panics
    ///
    /// Panics if any position is past the end of `seq`.
    pub fn remove_from<T>(&self, seq: &mut Vec<T>) {
        if let Err(err) = self.try_remove_from(seq) {
            panic!("remove_from: {err}");
        }
    }

    /// Checked form of [`remove_from`](Self::remove_from).
    pub fn try_remove_from<T>(&self, seq: &mut Vec<T>) -> IndexResult<()> {
        if let Some(last) = self.last() {
            if last >= seq.len() {
                return Err(IndexError::OutOfBounds {
                    index: last,
                    len: seq.len(),
                });
            }
        }
        for range in self.ranges().rev() {
            seq.drain(range);
        }
        Ok(())
    }

    /// Insert `elements` into `seq` so that they end up at the positions in
    /// this set, consuming `elements` in order.
    ///
    /// # Panics
    ///
    /// Panics if the set and `elements` differ in length, or if a position
    /// would leave a gap past the end of the growing sequence.
    pub fn insert_into<T>(&self, seq: &mut Vec<T>, elements: Vec<T>) {
        if let Err(err) = self.try_insert_into(seq, elements) {
            panic!("insert_into: {err}");
        }
    }

    /// Checked form of [`insert_into`](Self::insert_into).
    pub fn try_insert_into<T>(&self, seq: &mut Vec<T>, elements: Vec<T>) -> IndexResult<()> {
        if self.len() != elements.len() {
            return Err(IndexError::CountMismatch {
                indexes: self.len(),
                elements: elements.len(),
            });
        }

        let mut len = seq.len();
        for range in self.ranges() {
            if range.start > len {
                return Err(IndexError::OutOfBounds {
                    index: range.start,
                    len,
                });
            }
            len += range.len();
        }

        seq.reserve(elements.len());
        let mut elements = elements.into_iter();
        for range in self.ranges() {
            let at = range.start;
            seq.splice(at..at, elements.by_ref().take(range.len()));
        }
        Ok(())
    }

    /// Clones of the elements of `seq` at the positions in this set, ascending.
    ///
    /// # Panics
    ///
    /// Panics if any position is past the end of `seq`.
    pub fn select<T: Clone>(&self, seq: &[T]) -> Vec<T> {
        match self.try_select(seq) {
            Ok(selected) => selected,
            Err(err) => panic!("select: {err}"),
        }
    }

    /// Checked form of [`select`](Self::select).
    pub fn try_select<T: Clone>(&self, seq: &[T]) -> IndexResult<Vec<T>> {
        if let Some(last) = self.last() {
            if last >= seq.len() {
                return Err(IndexError::OutOfBounds {
                    index: last,
                    len: seq.len(),
                });
            }
        }
        let mut result = Vec::with_capacity(self.len());
        for range in self.ranges() {
            result.extend_from_slice(&seq[range]);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(indexes: &[usize]) -> IndexSet {
        indexes.iter().copied().collect()
    }

    #[test]
    fn remove_scattered_runs() {
        let mut v: Vec<char> = "abcdefgh".chars().collect();
        set(&[0, 1, 4, 7]).remove_from(&mut v);
        assert_eq!(v.into_iter().collect::<String>(), "cdfg");
    }

    #[test]
    fn remove_nothing() {
        let mut v = vec![1, 2, 3];
        IndexSet::new().remove_from(&mut v);
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn remove_out_of_bounds_leaves_sequence_intact() {
        let mut v = vec![1, 2, 3];
        let err = set(&[0, 3]).try_remove_from(&mut v).unwrap_err();
        assert_eq!(err, IndexError::OutOfBounds { index: 3, len: 3 });
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn remove_out_of_bounds_panics() {
        let mut v = vec![1];
        set(&[5]).remove_from(&mut v);
    }

    #[test]
    fn insert_lands_at_named_positions() {
        let mut v = vec!['b', 'd'];
        let at = set(&[0, 2, 4, 5]);
        at.insert_into(&mut v, vec!['A', 'C', 'E', 'F']);
        assert_eq!(v.iter().collect::<String>(), "AbCdEF");
        assert_eq!(at.select(&v), vec!['A', 'C', 'E', 'F']);
    }

    #[test]
    fn insert_into_empty() {
        let mut v: Vec<u32> = Vec::new();
        IndexSet::from_range(0..3).insert_into(&mut v, vec![7, 8, 9]);
        assert_eq!(v, vec![7, 8, 9]);
    }

    #[test]
    fn insert_count_mismatch() {
        let mut v = vec![1, 2];
        let err = set(&[0, 1]).try_insert_into(&mut v, vec![9]).unwrap_err();
        assert_eq!(err, IndexError::CountMismatch { indexes: 2, elements: 1 });
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "count mismatch")]
    fn insert_count_mismatch_panics() {
        let mut v = vec![1, 2];
        set(&[0]).insert_into(&mut v, vec![]);
    }

    #[test]
    fn insert_gap_past_end() {
        let mut v = vec![1];
        let err = set(&[3]).try_insert_into(&mut v, vec![9]).unwrap_err();
        assert_eq!(err, IndexError::OutOfBounds { index: 3, len: 1 });
        assert_eq!(v, vec![1]);
    }

    #[test]
    fn select_walks_runs() {
        let v = vec![10, 11, 12, 13, 14];
        assert_eq!(set(&[1, 2, 4]).select(&v), vec![11, 12, 14]);
        assert!(IndexSet::new().select(&v).is_empty());
        assert!(set(&[5]).try_select(&v).is_err());
    }

    proptest! {
        #[test]
        fn remove_then_reinsert_restores(
            values in proptest::collection::vec(any::<u8>(), 0..40),
            picks in proptest::collection::vec(any::<bool>(), 0..40),
        ) {
            let at: IndexSet = picks
                .iter()
                .take(values.len())
                .enumerate()
                .filter(|(_, keep)| **keep)
                .map(|(i, _)| i)
                .collect();

            let removed = at.select(&values);
            let mut edited = values.clone();
            at.remove_from(&mut edited);
            prop_assert_eq!(edited.len(), values.len() - at.len());

            at.insert_into(&mut edited, removed);
            prop_assert_eq!(edited, values);
        }
    }
}
