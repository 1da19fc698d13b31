//! Batch updates for a two-level view.
//!
//! A renderer that shows sections of rows implements [`ChangeSink`] and
//! receives a computed diff as a small number of batches. The batches come
//! in the only order that keeps every index valid while the view edits
//! itself:
//!
//! 1. item deletes, descending, in old section numbering
//! 2. section deletes
//! 3. section inserts
//! 4. item inserts, ascending, in new section numbering
//!
//! Empty batches are not sent.

use serde::{Deserialize, Serialize};

use adiff_index::{IndexPath, IndexSet, Order};

use crate::diff::ArrayDiff;
use crate::nested::NestedDiff;

/// Receiver of batched view updates.
pub trait ChangeSink {
    fn delete_items(&mut self, paths: &[IndexPath]);

    fn delete_sections(&mut self, sections: &IndexSet);

    fn insert_sections(&mut self, sections: &IndexSet);

    fn insert_items(&mut self, paths: &[IndexPath]);
}

/// One recorded batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "indexes", rename_all = "snake_case")]
pub enum Change {
    DeleteItems(Vec<IndexPath>),
    DeleteSections(IndexSet),
    InsertSections(IndexSet),
    InsertItems(Vec<IndexPath>),
}

/// Records batches in arrival order.
impl ChangeSink for Vec<Change> {
    fn delete_items(&mut self, paths: &[IndexPath]) {
        self.push(Change::DeleteItems(paths.to_vec()));
    }

    fn delete_sections(&mut self, sections: &IndexSet) {
        self.push(Change::DeleteSections(sections.clone()));
    }

    fn insert_sections(&mut self, sections: &IndexSet) {
        self.push(Change::InsertSections(sections.clone()));
    }

    fn insert_items(&mut self, paths: &[IndexPath]) {
        self.push(Change::InsertItems(paths.to_vec()));
    }
}

impl ArrayDiff {
    /// Report this diff as item updates within `section`.
    pub fn apply_to_items<S: ChangeSink + ?Sized>(&self, sink: &mut S, section: usize) {
        self.delete_items_from(sink, section);
        self.insert_items_into(sink, section);
    }

    /// Report this diff as section updates.
    pub fn apply_to_sections<S: ChangeSink + ?Sized>(&self, sink: &mut S) {
        if !self.removed_indexes().is_empty() {
            sink.delete_sections(self.removed_indexes());
        }
        if !self.inserted_indexes().is_empty() {
            sink.insert_sections(self.inserted_indexes());
        }
    }

    fn delete_items_from<S: ChangeSink + ?Sized>(&self, sink: &mut S, section: usize) {
        if !self.removed_indexes().is_empty() {
            let paths = self
                .removed_indexes()
                .index_paths_in_section(section, Order::Descending);
            sink.delete_items(&paths);
        }
    }

    fn insert_items_into<S: ChangeSink + ?Sized>(&self, sink: &mut S, section: usize) {
        if !self.inserted_indexes().is_empty() {
            let paths = self
                .inserted_indexes()
                .index_paths_in_section(section, Order::Ascending);
            sink.insert_items(&paths);
        }
    }
}

impl NestedDiff {
    /// Report this diff to `sink` in safe order.
    ///
    /// # Panics
    ///
    /// Panics if an item diff belongs to a section that was removed.
    pub fn apply_to<S: ChangeSink + ?Sized>(&self, sink: &mut S) {
        for update in self.section_updates() {
            update.items.delete_items_from(sink, update.old_section);
        }
        self.sections_diff().apply_to_sections(sink);
        for update in self.section_updates() {
            update.items.insert_items_into(sink, update.new_section);
        }
    }
}
