//! Two-level `(section, item)` positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::set::{IndexSet, Order};

/// The position of an item inside a sectioned sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.item)
    }
}

impl IndexSet {
    /// One [`IndexPath`] per member, all in `section`, in the given order.
    ///
    /// Report removals [`Order::Descending`] and insertions
    /// [`Order::Ascending`] so that no batch entry shifts a later one.
    pub fn index_paths_in_section(&self, section: usize, order: Order) -> Vec<IndexPath> {
        self.iter_ordered(order)
            .map(|item| IndexPath::new(section, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_order() {
        let s: IndexSet = [4, 1, 2].into_iter().collect();

        let asc = s.index_paths_in_section(3, Order::Ascending);
        assert_eq!(asc, vec![IndexPath::new(3, 1), IndexPath::new(3, 2), IndexPath::new(3, 4)]);

        let desc = s.index_paths_in_section(3, Order::Descending);
        assert_eq!(desc, vec![IndexPath::new(3, 4), IndexPath::new(3, 2), IndexPath::new(3, 1)]);
    }

    #[test]
    fn paths_sort_section_major() {
        let mut paths = vec![IndexPath::new(1, 0), IndexPath::new(0, 5), IndexPath::new(0, 2)];
        paths.sort();
        assert_eq!(paths, vec![IndexPath::new(0, 2), IndexPath::new(0, 5), IndexPath::new(1, 0)]);
        assert_eq!(IndexPath::new(2, 7).to_string(), "2.7");
    }
}
