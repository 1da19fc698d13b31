//! Two-level diffs over sections of items.
//!
//! A [`NestedDiff`] pairs a diff over the sections themselves with one item
//! diff per old section. Sections are matched by identity
//! ([`Section::same_section`]), not by content, so a retained section may
//! carry a non-empty item diff. Item diffs are indexed by old section
//! position; their inserted indexes refer to the matching new section, found
//! through [`ArrayDiff::new_index_for_old_index`].
//!
//! The diff is recomputed from scratch for every transition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diff::{ArrayDiff, Side};
use crate::engine::diff_by;
use crate::error::{DiffError, DiffResult};

/// A named group of items in a two-level sequence.
pub trait Section {
    type Item;

    /// Returns `true` if `other` is the same section, regardless of its items.
    fn same_section(&self, other: &Self) -> bool;

    fn items(&self) -> &[Self::Item];

    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}

/// A section identified by its name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasicSection<T> {
    pub name: String,
    pub items: Vec<T>,
}

impl<T> BasicSection<T> {
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

impl<T> Section for BasicSection<T> {
    type Item = T;

    fn same_section(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn items(&self) -> &[T] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

/// A section diff plus an item diff for every retained old section.
///
/// # Invariants
///
/// - `item_diffs.len()` equals the old section count.
/// - `item_diffs[i]` is present exactly when old section `i` is retained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNestedDiff")]
pub struct NestedDiff {
    sections_diff: ArrayDiff,
    item_diffs: Vec<Option<ArrayDiff>>,
}

#[derive(Deserialize)]
struct RawNestedDiff {
    sections_diff: ArrayDiff,
    item_diffs: Vec<Option<ArrayDiff>>,
}

impl TryFrom<RawNestedDiff> for NestedDiff {
    type Error = DiffError;

    fn try_from(raw: RawNestedDiff) -> DiffResult<Self> {
        if raw.item_diffs.len() != raw.sections_diff.old_count() {
            return Err(DiffError::InconsistentParts(format!(
                "{} item diffs for {} old sections",
                raw.item_diffs.len(),
                raw.sections_diff.old_count()
            )));
        }
        for (old_section, items) in raw.item_diffs.iter().enumerate() {
            let retained = raw.sections_diff.common_indexes().contains(old_section);
            if retained != items.is_some() {
                return Err(DiffError::InconsistentParts(format!(
                    "old section {old_section}: retained={retained} but item diff present={}",
                    items.is_some()
                )));
            }
        }
        Ok(Self {
            sections_diff: raw.sections_diff,
            item_diffs: raw.item_diffs,
        })
    }
}

/// The item edit for one retained section, with both of its positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionUpdate<'a> {
    pub old_section: usize,
    pub new_section: usize,
    pub items: &'a ArrayDiff,
}

impl NestedDiff {
    /// The diff over the sections themselves.
    pub fn sections_diff(&self) -> &ArrayDiff {
        &self.sections_diff
    }

    /// One entry per old section; `None` for removed sections.
    pub fn item_diffs(&self) -> &[Option<ArrayDiff>] {
        &self.item_diffs
    }

    /// The item diff of old section `old_section`, if it was retained.
    pub fn item_diff(&self, old_section: usize) -> Option<&ArrayDiff> {
        self.item_diffs.get(old_section).and_then(Option::as_ref)
    }

    /// Returns `true` if no section and no item changed.
    pub fn is_empty(&self) -> bool {
        self.sections_diff.is_empty() && self.item_diffs.iter().flatten().all(ArrayDiff::is_empty)
    }

    /// Every retained section with its new position, in old section order.
    ///
    /// # Panics
    ///
    /// Panics if an item diff belongs to a section that was removed.
    pub fn section_updates(&self) -> impl Iterator<Item = SectionUpdate<'_>> + '_ {
        self.item_diffs
            .iter()
            .enumerate()
            .filter_map(|(old_section, items)| {
                let items = items.as_ref()?;
                let new_section = match self.sections_diff.new_index_for_old_index(old_section) {
                    Some(new_section) => new_section,
                    None => panic!("{}", DiffError::MissingSection { old_section }),
                };
                Some(SectionUpdate {
                    old_section,
                    new_section,
                    items,
                })
            })
    }

    // ---------------------------------------------------------------
    // Replay
    // ---------------------------------------------------------------

    /// Edit `old` in place into `new` across both levels.
    ///
    /// Order: item removals (old section numbering), section removals,
    /// section insertions (clones from `new`), item insertions (new section
    /// numbering, clones from `new`).
    ///
    /// # Panics
    ///
    /// Panics if `old` or `new` do not have the shape this diff was computed for.
    pub fn apply<S>(&self, old: &mut Vec<S>, new: &[S])
    where
        S: Section + Clone,
        S::Item: Clone,
    {
        if let Err(err) = self.try_apply(old, new) {
            panic!("NestedDiff::apply: {err}");
        }
    }

    /// Checked form of [`apply`](Self::apply). `old` is untouched on error.
    pub fn try_apply<S>(&self, old: &mut Vec<S>, new: &[S]) -> DiffResult<()>
    where
        S: Section + Clone,
        S::Item: Clone,
    {
        self.sections_diff.check_lengths(old.len(), new.len())?;
        let updates: Vec<SectionUpdate<'_>> = self.section_updates().collect();
        for update in &updates {
            check_item_lengths(update, old, new)?;
        }

        for update in &updates {
            update
                .items
                .removed_indexes()
                .try_remove_from(old[update.old_section].items_mut())?;
        }

        let inserted_sections = self.sections_diff.inserted_indexes().try_select(new)?;
        self.sections_diff.removed_indexes().try_remove_from(old)?;
        self.sections_diff
            .inserted_indexes()
            .try_insert_into(old, inserted_sections)?;

        for update in &updates {
            let inserted_items = update
                .items
                .inserted_indexes()
                .try_select(new[update.new_section].items())?;
            update
                .items
                .inserted_indexes()
                .try_insert_into(old[update.new_section].items_mut(), inserted_items)?;
        }
        Ok(())
    }
}

fn check_item_lengths<S: Section>(update: &SectionUpdate<'_>, old: &[S], new: &[S]) -> DiffResult<()> {
    let old_len = old[update.old_section].items().len();
    let new_len = new[update.new_section].items().len();
    if old_len != update.items.old_count() {
        return Err(DiffError::LengthMismatch {
            side: Side::Old,
            expected: update.items.old_count(),
            actual: old_len,
        });
    }
    if new_len != update.items.new_count() {
        return Err(DiffError::LengthMismatch {
            side: Side::New,
            expected: update.items.new_count(),
            actual: new_len,
        });
    }
    Ok(())
}

/// Diff two sectioned sequences, comparing items with `==`.
pub fn diff_nested<S>(old: &[S], new: &[S]) -> NestedDiff
where
    S: Section,
    S::Item: PartialEq,
{
    diff_nested_by(old, new, |a, b| a == b)
}

/// Diff two sectioned sequences with a caller-supplied item equality.
pub fn diff_nested_by<S, F>(old: &[S], new: &[S], mut item_eq: F) -> NestedDiff
where
    S: Section,
    F: FnMut(&S::Item, &S::Item) -> bool,
{
    let sections_diff = diff_by(old, new, |a, b| a.same_section(b));

    let item_diffs: Vec<Option<ArrayDiff>> = old
        .iter()
        .enumerate()
        .map(|(old_section, section)| {
            if !sections_diff.common_indexes().contains(old_section) {
                return None;
            }
            let new_section = match sections_diff.new_index_for_old_index(old_section) {
                Some(new_section) => new_section,
                None => panic!("{}", DiffError::MissingSection { old_section }),
            };
            Some(diff_by(section.items(), new[new_section].items(), &mut item_eq))
        })
        .collect();

    debug!(
        old_sections = old.len(),
        new_sections = new.len(),
        removed_sections = sections_diff.removed_indexes().len(),
        inserted_sections = sections_diff.inserted_indexes().len(),
        "computed nested diff"
    );

    NestedDiff {
        sections_diff,
        item_diffs,
    }
}
