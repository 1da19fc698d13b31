//! The ordered integer set behind every diff.
//!
//! [`IndexSet`] stores its members as a sorted vector of disjoint,
//! non-adjacent half-open ranges. Membership and range counting are binary
//! searches over that vector followed by a walk over the ranges that overlap
//! the query, so `count_in` costs `O(log r + k)` for `r` stored ranges and
//! `k` overlapping ones.
//!
//! # Invariants
//!
//! - `ranges` is sorted ascending by `start`.
//! - Every range is non-empty.
//! - Consecutive ranges are separated by at least one missing integer
//!   (`ranges[i].end < ranges[i + 1].start`), so there is exactly one
//!   representation per set.
//! - `len` equals the sum of the range lengths.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Direction for enumerating an [`IndexSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Smallest index first. Use for insertions.
    #[default]
    Ascending,
    /// Largest index first. Use for removals.
    Descending,
}

/// An ordered, deduplicated set of non-negative integers below `usize::MAX`.
///
/// Serializes as an ascending array of integers. Deserializing an array that
/// holds `usize::MAX` fails.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct IndexSet {
    ranges: Vec<Range<usize>>,
    len: usize,
}

impl IndexSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding every integer in `range`.
    pub fn from_range(range: Range<usize>) -> Self {
        let mut set = Self::new();
        set.insert_range(range);
        set
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest member.
    pub fn first(&self) -> Option<usize> {
        self.ranges.first().map(|r| r.start)
    }

    /// Largest member.
    pub fn last(&self) -> Option<usize> {
        self.ranges.last().map(|r| r.end - 1)
    }

    /// Returns `true` if `index` is a member.
    pub fn contains(&self, index: usize) -> bool {
        let pos = self.ranges.partition_point(|r| r.end <= index);
        self.ranges.get(pos).is_some_and(|r| r.start <= index)
    }

    /// Add `index`. Returns `false` if it was already present.
    ///
    /// # Panics
    ///
    /// Panics if `index` is `usize::MAX`.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.try_insert(index) {
            Ok(added) => added,
            Err(err) => panic!("insert: {err}"),
        }
    }

    /// Checked form of [`insert`](Self::insert).
    pub fn try_insert(&mut self, index: usize) -> IndexResult<bool> {
        let end = index.checked_add(1).ok_or(IndexError::TooLarge { index })?;
        if self.contains(index) {
            return Ok(false);
        }
        self.insert_range(index..end);
        Ok(true)
    }

    /// Add every integer in `range`, coalescing with neighbouring ranges.
    pub fn insert_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        // Ranges in lo..hi overlap or touch `range` and collapse into it.
        let lo = self.ranges.partition_point(|r| r.end < range.start);
        let hi = self.ranges.partition_point(|r| r.start <= range.end);

        let mut merged = range;
        let mut absorbed = 0;
        for r in &self.ranges[lo..hi] {
            merged.start = merged.start.min(r.start);
            merged.end = merged.end.max(r.end);
            absorbed += r.len();
        }

        self.len = self.len - absorbed + merged.len();
        self.ranges.splice(lo..hi, std::iter::once(merged));
    }

    /// Remove `index`. Returns `false` if it was not present.
    pub fn remove(&mut self, index: usize) -> bool {
        let pos = self.ranges.partition_point(|r| r.end <= index);
        let Some(range) = self.ranges.get(pos).cloned() else {
            return false;
        };
        if range.start > index {
            return false;
        }

        let before = range.start..index;
        let after = index + 1..range.end;
        match (before.is_empty(), after.is_empty()) {
            (true, true) => {
                self.ranges.remove(pos);
            }
            (true, false) => self.ranges[pos] = after,
            (false, true) => self.ranges[pos] = before,
            (false, false) => {
                self.ranges[pos] = before;
                self.ranges.insert(pos + 1, after);
            }
        }
        self.len -= 1;
        true
    }

    /// Number of members that fall inside the half-open `range`.
    pub fn count_in(&self, range: Range<usize>) -> usize {
        if range.is_empty() {
            return 0;
        }
        let start = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges[start..]
            .iter()
            .take_while(|r| r.start < range.end)
            .map(|r| r.end.min(range.end) - r.start.max(range.start))
            .sum()
    }

    /// The integers in `range` that are not members of this set.
    pub fn complement_within(&self, range: Range<usize>) -> IndexSet {
        let mut result = IndexSet::new();
        let mut cursor = range.start;
        let start = self.ranges.partition_point(|r| r.end <= range.start);
        for r in self.ranges[start..].iter().take_while(|r| r.start < range.end) {
            result.insert_range(cursor..r.start.min(range.end));
            cursor = r.end;
        }
        result.insert_range(cursor..range.end);
        result
    }

    /// Members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self
                .ranges
                .iter()
                .flat_map(<Range<usize>>::clone as fn(&Range<usize>) -> Range<usize>),
            remaining: self.len,
        }
    }

    /// Members in the requested order. Each call starts a fresh pass.
    pub fn iter_ordered(&self, order: Order) -> Ordered<'_> {
        match order {
            Order::Ascending => Ordered::Ascending(self.iter()),
            Order::Descending => Ordered::Descending(self.iter().rev()),
        }
    }

    /// The contiguous runs of members, ascending. Reverse for descending.
    pub fn ranges(&self) -> Ranges<'_> {
        Ranges {
            inner: self.ranges.iter(),
        }
    }
}

// ---------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------

type FlatRanges<'a> =
    std::iter::FlatMap<slice::Iter<'a, Range<usize>>, Range<usize>, fn(&Range<usize>) -> Range<usize>>;

/// Ascending iterator over the members of an [`IndexSet`].
#[derive(Clone)]
pub struct Iter<'a> {
    inner: FlatRanges<'a>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let next = self.inner.next()?;
        self.remaining -= 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<usize> {
        let next = self.inner.next_back()?;
        self.remaining -= 1;
        Some(next)
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// Iterator over the members of an [`IndexSet`] in a chosen [`Order`].
#[derive(Clone)]
pub enum Ordered<'a> {
    Ascending(Iter<'a>),
    Descending(std::iter::Rev<Iter<'a>>),
}

impl Iterator for Ordered<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Ordered::Ascending(it) => it.next(),
            Ordered::Descending(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Ordered::Ascending(it) => it.size_hint(),
            Ordered::Descending(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Ordered<'_> {}

/// Iterator over the contiguous runs of an [`IndexSet`].
#[derive(Clone, Debug)]
pub struct Ranges<'a> {
    inner: slice::Iter<'a, Range<usize>>,
}

impl Iterator for Ranges<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        self.inner.next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Ranges<'_> {
    fn next_back(&mut self) -> Option<Range<usize>> {
        self.inner.next_back().cloned()
    }
}

impl ExactSizeIterator for Ranges<'_> {}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ---------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = IndexSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for IndexSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

impl From<Range<usize>> for IndexSet {
    fn from(range: Range<usize>) -> Self {
        IndexSet::from_range(range)
    }
}

impl TryFrom<Vec<usize>> for IndexSet {
    type Error = IndexError;

    fn try_from(indexes: Vec<usize>) -> IndexResult<Self> {
        let mut set = IndexSet::new();
        for index in indexes {
            set.try_insert(index)?;
        }
        Ok(set)
    }
}

impl From<IndexSet> for Vec<usize> {
    fn from(set: IndexSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for IndexSet {
    /// Formats as `[0..3, 7]`: half-open runs, single members bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if r.len() == 1 {
                write!(f, "{}", r.start)?;
            } else {
                write!(f, "{}..{}", r.start, r.end)?;
            }
        }
        f.write_str("]")
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
    fn empty_set() {
        let s = IndexSet::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.first(), None);
        assert_eq!(s.last(), None);
        assert!(!s.contains(0));
        assert_eq!(s.count_in(0..100), 0);
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut s = IndexSet::new();
        assert!(s.insert(4));
        assert!(!s.insert(4));
        assert_eq!(s.len(), 1);
        assert!(s.contains(4));
        assert!(!s.contains(3));
        assert!(!s.contains(5));
    }

    #[test]
    fn adjacent_inserts_coalesce() {
        let s = set(&[3, 1, 2, 7, 8, 0]);
        assert_eq!(s.ranges().collect::<Vec<_>>(), vec![0..4, 7..9]);
        assert_eq!(s.len(), 6);
    }

    #[test]
    fn insert_bridges_gap() {
        let mut s = set(&[0, 1, 3, 4]);
        assert_eq!(s.ranges().count(), 2);
        s.insert(2);
        assert_eq!(s.ranges().collect::<Vec<_>>(), vec![0..5]);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn insert_range_absorbs_overlaps() {
        let mut s = set(&[1, 5, 9, 20]);
        s.insert_range(4..10);
        assert_eq!(s.ranges().collect::<Vec<_>>(), vec![1..2, 4..10, 20..21]);
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn remove_splits_range() {
        let mut s = IndexSet::from_range(0..5);
        assert!(s.remove(2));
        assert!(!s.remove(2));
        assert_eq!(s.ranges().collect::<Vec<_>>(), vec![0..2, 3..5]);
        assert!(s.remove(0));
        assert!(s.remove(4));
        assert_eq!(s.ranges().collect::<Vec<_>>(), vec![1..2, 3..4]);
        assert!(s.remove(1));
        assert!(s.remove(3));
        assert!(s.is_empty());
    }

    #[test]
    fn count_in_clips_to_query() {
        let s = set(&[0, 1, 2, 5, 6, 10]);
        assert_eq!(s.count_in(0..0), 0);
        assert_eq!(s.count_in(0..1), 1);
        assert_eq!(s.count_in(1..6), 3);
        assert_eq!(s.count_in(3..5), 0);
        assert_eq!(s.count_in(6..11), 2);
        assert_eq!(s.count_in(0..usize::MAX), 6);
    }

    #[test]
    fn complement_within_bounds() {
        let s = set(&[1, 3, 4, 9]);
        assert_eq!(s.complement_within(0..6), set(&[0, 2, 5]));
        assert_eq!(s.complement_within(2..4), set(&[2]));
        assert_eq!(IndexSet::new().complement_within(0..3), IndexSet::from_range(0..3));
        assert!(IndexSet::from_range(0..3).complement_within(0..3).is_empty());
    }

    #[test]
    fn ordered_iteration_is_restartable() {
        let s = set(&[2, 0, 7, 3]);
        let asc: Vec<_> = s.iter_ordered(Order::Ascending).collect();
        let desc: Vec<_> = s.iter_ordered(Order::Descending).collect();
        assert_eq!(asc, vec![0, 2, 3, 7]);
        assert_eq!(desc, vec![7, 3, 2, 0]);
        assert_eq!(s.iter_ordered(Order::Descending).len(), 4);
        assert_eq!(s.iter_ordered(Order::Ascending).collect::<Vec<_>>(), asc);
    }

    #[test]
    fn display_format() {
        assert_eq!(set(&[0, 1, 2, 7]).to_string(), "[0..3, 7]");
        assert_eq!(IndexSet::new().to_string(), "[]");
    }

    #[test]
    fn serde_as_integer_array() {
        let s = set(&[5, 1, 2]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[1,2,5]");
        let back: IndexSet = serde_json::from_str("[5,2,1,2]").unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn max_index_is_rejected() {
        let mut s = set(&[3]);
        assert_eq!(s.try_insert(usize::MAX), Err(IndexError::TooLarge { index: usize::MAX }));
        assert_eq!(s, set(&[3]));
        assert_eq!(s.try_insert(usize::MAX - 1), Ok(true));
        assert_eq!(s.last(), Some(usize::MAX - 1));

        assert!(IndexSet::try_from(vec![1, usize::MAX]).is_err());
        let json = format!("[1,{}]", usize::MAX);
        assert!(serde_json::from_str::<IndexSet>(&json).is_err());
    }

    #[test]
    #[should_panic(expected = "too large")]
    fn insert_max_panics() {
        IndexSet::new().insert(usize::MAX);
    }

    proptest! {
        #[test]
        fn matches_sorted_dedup_model(values in proptest::collection::vec(0usize..64, 0..40)) {
            let s: IndexSet = values.iter().copied().collect();
            let mut model = values.clone();
            model.sort_unstable();
            model.dedup();

            prop_assert_eq!(s.len(), model.len());
            prop_assert_eq!(s.iter().collect::<Vec<_>>(), model.clone());
            for index in 0..64 {
                prop_assert_eq!(s.contains(index), model.contains(&index));
            }
            for lo in 0..16 {
                let hi = lo * 4;
                let expected = model.iter().filter(|v| (lo..hi).contains(*v)).count();
                prop_assert_eq!(s.count_in(lo..hi), expected);
            }
        }

        #[test]
        fn remove_matches_model(
            values in proptest::collection::vec(0usize..32, 0..30),
            removals in proptest::collection::vec(0usize..32, 0..10),
        ) {
            let mut s: IndexSet = values.iter().copied().collect();
            let mut model: std::collections::BTreeSet<usize> = values.into_iter().collect();
            for r in removals {
                prop_assert_eq!(s.remove(r), model.remove(&r));
            }
            prop_assert_eq!(s.len(), model.len());
            prop_assert_eq!(s.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
        }
    }
}
