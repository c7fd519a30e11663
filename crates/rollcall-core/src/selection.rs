//! Which departments are visible on the board.

use std::collections::BTreeSet;

use crate::model::DepartmentSnapshot;

/// Set of selected department names.
///
/// Names are not pruned when a department disappears from the feed; the
/// layout only ever iterates departments present in the latest snapshot,
/// so stale names simply stop matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// True iff the selection is as large as the known department list and
    /// that list is non-empty.
    pub fn is_all_selected(&self, known: &[DepartmentSnapshot]) -> bool {
        !known.is_empty() && self.selected.len() == known.len()
    }

    /// Toggle between "every known department" and "none".
    pub fn select_all(&mut self, known: &[DepartmentSnapshot]) {
        if self.is_all_selected(known) {
            self.selected.clear();
        } else {
            self.reset(known);
        }
    }

    /// Select exactly the departments in `known`.
    pub fn reset(&mut self, known: &[DepartmentSnapshot]) {
        self.selected = known.iter().map(|d| d.department_name.clone()).collect();
    }

    /// Add `name` if absent, remove it if present.
    pub fn toggle(&mut self, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_owned());
        }
    }

    /// First-load rule: an empty selection becomes "all". Returns whether
    /// it changed anything.
    pub fn initialize_if_empty(&mut self, known: &[DepartmentSnapshot]) -> bool {
        if !self.selected.is_empty() || known.is_empty() {
            return false;
        }
        self.reset(known);
        true
    }

    /// Selected departments in snapshot order.
    pub fn filter<'a>(&self, departments: &'a [DepartmentSnapshot]) -> Vec<&'a DepartmentSnapshot> {
        departments
            .iter()
            .filter(|d| self.selected.contains(&d.department_name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn departments(names: &[&str]) -> Vec<DepartmentSnapshot> {
        names
            .iter()
            .map(|n| DepartmentSnapshot {
                department_name: (*n).to_owned(),
                display_order: 0,
                employees: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn reset_is_idempotent() {
        let known = departments(&["A", "B", "C"]);
        let mut once = SelectionState::new();
        once.toggle("B");
        once.reset(&known);

        let mut twice = once.clone();
        twice.reset(&known);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let known = departments(&["A", "B"]);
        let mut selection = SelectionState::new();
        selection.reset(&known);
        let before = selection.clone();

        selection.toggle("A");
        assert!(!selection.contains("A"));
        selection.toggle("A");
        assert_eq!(selection, before);

        selection.toggle("Z");
        selection.toggle("Z");
        assert_eq!(selection, before);
    }

    #[test]
    fn select_all_toggles_between_all_and_none() {
        let known = departments(&["A", "B"]);
        let mut selection = SelectionState::new();

        selection.select_all(&known);
        assert!(selection.is_all_selected(&known));

        selection.select_all(&known);
        assert!(selection.is_empty());

        selection.toggle("A");
        selection.select_all(&known);
        assert!(selection.is_all_selected(&known));
    }

    #[test]
    fn nothing_is_all_selected_without_departments() {
        let selection = SelectionState::new();
        assert!(!selection.is_all_selected(&[]));
    }

    #[test]
    fn initialize_only_fills_an_empty_selection() {
        let known = departments(&["A", "B"]);
        let mut selection = SelectionState::new();
        assert!(selection.initialize_if_empty(&known));
        assert_eq!(selection.len(), 2);

        selection.toggle("A");
        let grown = departments(&["A", "B", "C"]);
        assert!(!selection.initialize_if_empty(&grown));
        assert_eq!(selection.selected().iter().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn filter_keeps_snapshot_order_and_drops_stale_names() {
        let mut selection = SelectionState::new();
        selection.toggle("C");
        selection.toggle("A");
        selection.toggle("Gone");

        let known = departments(&["C", "B", "A"]);
        let names: Vec<_> = selection
            .filter(&known)
            .iter()
            .map(|d| d.department_name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A"]);
    }
}
