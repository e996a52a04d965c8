use super::{RowId, RowSelection};

/// Visibility of the bulk action bar. A pure function of the selection count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionBarState {
    #[default]
    Hidden,
    Visible {
        count: usize,
    },
}

impl ActionBarState {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Self::Hidden
        } else {
            Self::Visible { count }
        }
    }

    pub fn from_selection(selection: &RowSelection) -> Self {
        Self::from_count(selection.len())
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Hidden => 0,
            Self::Visible { count } => *count,
        }
    }

    pub fn label(&self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Visible { count } => Some(format!("{count} selected")),
        }
    }

    /// Empties the selection and hides the bar.
    pub fn close(self, selection: &mut RowSelection) -> Self {
        if self.is_visible() {
            log::debug!("action bar closed, clearing {} rows", selection.len());
        }
        selection.clear();
        Self::Hidden
    }
}

/// Selected ids as pretty-printed JSON for the "Selected Ids" viewer.
pub fn selected_ids_json(ids: &[RowId]) -> String {
    let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    serde_json::to_string_pretty(&ids).unwrap_or_else(|err| {
        log::warn!("failed to render selected ids: {err}");
        String::from("[]")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_follows_count() {
        assert_eq!(ActionBarState::from_count(0), ActionBarState::Hidden);
        let bar = ActionBarState::from_count(3);
        assert!(bar.is_visible());
        assert_eq!(bar.label().as_deref(), Some("3 selected"));
    }

    #[test]
    fn close_clears_selection() {
        let mut selection = RowSelection::new();
        selection.set(RowId::from("row-1"), true);
        let bar = ActionBarState::from_selection(&selection);
        assert!(bar.is_visible());

        let bar = bar.close(&mut selection);
        assert!(selection.is_empty());
        assert!(!bar.is_visible());
        assert_eq!(ActionBarState::from_selection(&selection), bar);
    }

    #[test]
    fn ids_render_as_json_array() {
        let json = selected_ids_json(&[RowId::from("a"), RowId::from("b")]);
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }
}
