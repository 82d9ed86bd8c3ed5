use super::FrameCollection;
use std::collections::BTreeSet;
use tracing::debug;

/// Frame indices the user picked for export.
///
/// Scoped to one collection: members always lie in `0..bound`.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    scope: Option<u64>,
    bound: usize,
    members: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebinds the selection to `collection`, clearing it if the collection
    /// is not the one it was scoped to.
    pub fn scope_to(&mut self, collection: &FrameCollection) {
        if self.scope != Some(collection.epoch()) {
            self.clear();
            self.scope = Some(collection.epoch());
            self.bound = collection.len();
        }
    }

    /// Drops every member and the collection scope.
    pub fn reset(&mut self) {
        self.clear();
        self.scope = None;
        self.bound = 0;
    }

    pub fn toggle(&mut self, index: usize) {
        if index >= self.bound {
            debug!(index, bound = self.bound, "Ignoring out-of-range toggle");
            return;
        }
        if !self.members.remove(&index) {
            self.members.insert(index);
        }
    }

    pub fn select_all(&mut self) {
        self.members = (0..self.bound).collect();
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Members in ascending index order.
    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(epoch: u64, n: usize) -> FrameCollection {
        FrameCollection::from_payloads(epoch, vec!["AAAA".to_string(); n])
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();
        selection.scope_to(&collection(1, 4));

        selection.toggle(2);
        assert!(selection.contains(2));
        selection.toggle(2);
        assert!(!selection.contains(2));
        assert!(selection.is_empty());
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut selection = SelectionSet::new();
        selection.scope_to(&collection(1, 3));
        selection.toggle(1);

        selection.toggle(3);
        selection.toggle(usize::MAX);

        assert_eq!(selection.members().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn unscoped_selection_accepts_nothing() {
        let mut selection = SelectionSet::new();
        selection.toggle(0);
        assert!(selection.is_empty());
    }

    #[test]
    fn new_collection_clears_selection() {
        let mut selection = SelectionSet::new();
        selection.scope_to(&collection(1, 6));
        selection.toggle(5);
        selection.toggle(0);

        selection.scope_to(&collection(2, 2));
        assert!(selection.is_empty());

        selection.toggle(5);
        assert!(selection.is_empty());
        selection.toggle(1);
        assert!(selection.contains(1));
    }

    #[test]
    fn rescoping_to_same_collection_keeps_members() {
        let frames = collection(7, 3);
        let mut selection = SelectionSet::new();
        selection.scope_to(&frames);
        selection.toggle(2);

        selection.scope_to(&frames);
        assert!(selection.contains(2));
    }

    #[test]
    fn members_iterate_in_ascending_order() {
        let mut selection = SelectionSet::new();
        selection.scope_to(&collection(1, 6));
        for index in [5, 0, 2] {
            selection.toggle(index);
        }
        assert_eq!(selection.members().iter().copied().collect::<Vec<_>>(), vec![0, 2, 5]);
    }

    #[test]
    fn select_all_covers_whole_collection() {
        let mut selection = SelectionSet::new();
        selection.scope_to(&collection(1, 3));
        selection.select_all();
        assert_eq!(selection.len(), 3);

        selection.reset();
        selection.select_all();
        assert!(selection.is_empty());
    }
}
