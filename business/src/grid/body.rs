use serde::Deserialize;

use super::{RowId, RowModel, RowSelection, TableState};

/// How the body looks while data is loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMode {
    #[default]
    Skeleton,
    Spinner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyMode {
    /// Placeholder rows, one per page slot.
    Skeleton { rows: usize },
    Spinner,
    Data,
    Empty { message: String },
}

impl BodyMode {
    pub fn resolve(
        loading: bool,
        mode: LoadingMode,
        row_count: usize,
        page_size: usize,
        empty_message: &str,
    ) -> Self {
        match (loading, mode) {
            (true, LoadingMode::Skeleton) if page_size > 0 => Self::Skeleton { rows: page_size },
            (true, LoadingMode::Spinner) => Self::Spinner,
            _ if row_count > 0 => Self::Data,
            _ => Self::Empty {
                message: empty_message.to_owned(),
            },
        }
    }
}

/// Presentation switches of one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub loading_mode: LoadingMode,
    pub empty_message: String,
    pub loading_message: String,
    pub dense: bool,
    pub row_border: bool,
    pub striped: bool,
    pub sticky_header: bool,
    pub resizable_columns: bool,
    pub pinnable_columns: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            loading_mode: LoadingMode::Skeleton,
            empty_message: String::from("No data available"),
            loading_message: String::from("Loading..."),
            dense: false,
            row_border: true,
            striped: false,
            sticky_header: true,
            resizable_columns: true,
            pinnable_columns: true,
        }
    }
}

impl GridOptions {
    pub fn row_height(&self) -> f32 {
        if self.dense { 32.0 } else { 44.0 }
    }
}

/// Per-row flags the renderer needs. Rebuilt with the row model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView {
    /// Position on the current page.
    pub position: usize,
    /// Index into the source records.
    pub record: usize,
    pub id: RowId,
    pub selected: bool,
    pub expanded: bool,
}

pub fn row_views(model: &RowModel, selection: &RowSelection, state: &TableState) -> Vec<RowView> {
    model
        .page_rows
        .iter()
        .zip(model.page_ids.iter())
        .enumerate()
        .map(|(position, (record, id))| RowView {
            position,
            record: *record,
            id: *id,
            selected: selection.is_selected(*id),
            expanded: state.is_expanded(*id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_modes() {
        assert_eq!(
            BodyMode::resolve(true, LoadingMode::Skeleton, 0, 25, "none"),
            BodyMode::Skeleton { rows: 25 }
        );
        assert_eq!(
            BodyMode::resolve(true, LoadingMode::Spinner, 10, 25, "none"),
            BodyMode::Spinner
        );
        // skeleton with no page slots falls through to the data check
        assert_eq!(
            BodyMode::resolve(true, LoadingMode::Skeleton, 3, 0, "none"),
            BodyMode::Data
        );
    }

    #[test]
    fn no_rows_is_the_empty_view() {
        assert_eq!(
            BodyMode::resolve(false, LoadingMode::Skeleton, 0, 25, "No data available"),
            BodyMode::Empty {
                message: "No data available".into()
            }
        );
        assert_eq!(
            BodyMode::resolve(false, LoadingMode::Spinner, 1, 25, ""),
            BodyMode::Data
        );
    }

    #[test]
    fn row_views_carry_selection() {
        let model = RowModel {
            page_rows: vec![4, 2],
            page_ids: vec![RowId::from("a"), RowId::from("b")],
            ..Default::default()
        };
        let mut selection = RowSelection::new();
        selection.set(RowId::from("b"), true);
        let mut state = TableState::default();
        state.toggle_expanded(RowId::from("a"));

        let views = row_views(&model, &selection, &state);
        assert_eq!(views[0].record, 4);
        assert!(views[0].expanded && !views[0].selected);
        assert!(views[1].selected && !views[1].expanded);
    }
}
