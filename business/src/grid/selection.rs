use std::collections::BTreeSet;

use super::RowId;

/// Tri-state of the select-all checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckState {
    #[default]
    Unchecked,
    Indeterminate,
    Checked,
}

/// Selected row ids. Survives paging, sorting and filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: BTreeSet<RowId>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// Returns the new state of the row.
    pub fn toggle(&mut self, id: RowId) -> bool {
        let selected = !self.is_selected(id);
        self.set(id, selected);
        selected
    }

    pub fn set(&mut self, id: RowId, selected: bool) {
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// True iff the page has rows and every one of them is selected.
    pub fn all_page_selected(&self, page: &[RowId]) -> bool {
        !page.is_empty() && page.iter().all(|id| self.is_selected(*id))
    }

    /// Some, but not all, page rows are selected.
    pub fn some_page_selected(&self, page: &[RowId]) -> bool {
        page.iter().any(|id| self.is_selected(*id)) && !self.all_page_selected(page)
    }

    pub fn page_check_state(&self, page: &[RowId]) -> CheckState {
        if self.all_page_selected(page) {
            CheckState::Checked
        } else if self.some_page_selected(page) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Selects the whole page, or clears it when it is already fully selected.
    pub fn toggle_all_page(&mut self, page: &[RowId]) {
        let select = !self.all_page_selected(page);
        for id in page {
            self.set(*id, select);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops ids that no longer exist.
    pub fn retain(&mut self, mut exists: impl FnMut(RowId) -> bool) {
        self.selected.retain(|id| exists(*id));
    }

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.selected.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
