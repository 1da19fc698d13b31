//! The sections currently presented, and how they change.

use tracing::debug;

use adiff_core::{diff_nested, BasicSection, ChangeSink, NestedDiff};

/// Sectioned data as last reported to the view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiveModel<T> {
    sections: Vec<BasicSection<T>>,
    revision: u64,
}

impl<T: PartialEq + Clone> LiveModel<T> {
    pub fn new(sections: Vec<BasicSection<T>>) -> Self {
        Self {
            sections,
            revision: 0,
        }
    }

    pub fn sections(&self) -> &[BasicSection<T>] {
        &self.sections
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move the model to `new`, reporting the change to `sink` first.
    ///
    /// Retained items stay the values already held; only removed and
    /// inserted ones change.
    pub fn update<S: ChangeSink + ?Sized>(
        &mut self,
        new: Vec<BasicSection<T>>,
        sink: &mut S,
    ) -> NestedDiff {
        let diff = diff_nested(&self.sections, &new);
        diff.apply_to(sink);
        diff.apply(&mut self.sections, &new);
        self.revision += 1;

        debug!(
            revision = self.revision,
            sections = self.sections.len(),
            unchanged = diff.is_empty(),
            "applied model update"
        );
        diff
    }

    pub fn into_sections(self) -> Vec<BasicSection<T>> {
        self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adiff_core::{Change, IndexPath, IndexSet};

    fn section(name: &str, items: &[u32]) -> BasicSection<u32> {
        BasicSection::new(name, items.to_vec())
    }

    #[test]
    fn update_reports_and_replaces() {
        let mut model = LiveModel::new(vec![section("a", &[1, 2, 3]), section("b", &[4, 5, 6])]);
        let next = vec![section("b", &[4, 6])];

        let mut log: Vec<Change> = Vec::new();
        let diff = model.update(next.clone(), &mut log);

        assert_eq!(model.sections(), next.as_slice());
        assert_eq!(model.revision(), 1);
        assert_eq!(diff.sections_diff().removed_indexes(), &IndexSet::from_range(0..1));
        assert_eq!(
            log,
            vec![
                Change::DeleteItems(vec![IndexPath::new(1, 1)]),
                Change::DeleteSections(IndexSet::from_range(0..1)),
            ]
        );
    }

    #[test]
    fn unchanged_update_sends_nothing() {
        let data = vec![section("a", &[1])];
        let mut model = LiveModel::new(data.clone());
        let mut log: Vec<Change> = Vec::new();

        let diff = model.update(data.clone(), &mut log);
        assert!(diff.is_empty());
        assert!(log.is_empty());
        assert_eq!(model.revision(), 1);
        assert_eq!(model.into_sections(), data);
    }

    #[test]
    fn successive_updates_chain() {
        let mut model = LiveModel::new(Vec::new());
        let mut log: Vec<Change> = Vec::new();

        model.update(vec![section("a", &[1])], &mut log);
        model.update(vec![section("a", &[1, 2]), section("b", &[])], &mut log);
        model.update(vec![section("b", &[3])], &mut log);

        assert_eq!(model.sections(), &[section("b", &[3])]);
        assert_eq!(model.revision(), 3);
        assert_eq!(
            log.last(),
            Some(&Change::InsertItems(vec![IndexPath::new(0, 0)]))
        );
    }
}
