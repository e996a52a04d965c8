use ustr::Ustr;

use super::{Align, ColumnDef, ColumnKind, PinSide, TableState};

/// Placement of one visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub id: Ustr,
    /// Index into the column definitions.
    pub column: usize,
    pub kind: ColumnKind,
    pub width: f32,
    /// Left edge in content coordinates, ignoring pinning.
    pub x: f32,
    pub pin: Option<PinSide>,
    /// Left pins: width of earlier left pins. Right pins: width of later right pins.
    pub pin_offset: f32,
    /// Last left pin or first right pin.
    pub pin_boundary: bool,
    pub resizable: bool,
    pub align: Align,
}

/// Visible columns in display order with their widths and pinned offsets.
///
/// Derived from [`TableState`] on every change, so offsets always agree with widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnLayout {
    pub slots: Vec<ColumnSlot>,
    pub total_width: f32,
    pub left_width: f32,
    pub right_width: f32,
}

impl ColumnLayout {
    pub fn project(columns: &[ColumnDef], state: &TableState) -> Self {
        let ordered = state.ordered(columns);
        let visible: Vec<&ColumnDef> = ordered
            .into_iter()
            .filter(|column| state.visibility.is_visible(&column.id))
            .collect();

        let pinned = |ids: &[Ustr]| -> Vec<&ColumnDef> {
            ids.iter()
                .filter_map(|id| visible.iter().copied().find(|column| column.id == *id))
                .filter(|column| column.pinnable)
                .collect()
        };
        let left = pinned(&state.pinning.left);
        let right = pinned(&state.pinning.right);
        let center: Vec<&ColumnDef> = visible
            .iter()
            .copied()
            .filter(|column| {
                !left.iter().any(|c| c.id == column.id) && !right.iter().any(|c| c.id == column.id)
            })
            .collect();

        let mut layout = Self::default();
        let mut x = 0.0;
        let mut push = |column: &ColumnDef, pin: Option<PinSide>, layout: &mut Self| {
            let width = state.sizing.width(column);
            layout.slots.push(ColumnSlot {
                id: column.id,
                column: columns
                    .iter()
                    .position(|c| c.id == column.id)
                    .unwrap_or_default(),
                kind: column.kind,
                width,
                x,
                pin,
                pin_offset: 0.0,
                pin_boundary: false,
                resizable: column.resizable,
                align: column.header_align,
            });
            x += width;
        };
        for column in &left {
            push(column, Some(PinSide::Left), &mut layout);
        }
        for column in &center {
            push(column, None, &mut layout);
        }
        for column in &right {
            push(column, Some(PinSide::Right), &mut layout);
        }
        layout.total_width = x;

        let mut offset = 0.0;
        for slot in layout.slots.iter_mut().filter(|s| s.pin == Some(PinSide::Left)) {
            slot.pin_offset = offset;
            offset += slot.width;
        }
        layout.left_width = offset;

        let mut offset = 0.0;
        for slot in layout
            .slots
            .iter_mut()
            .rev()
            .filter(|s| s.pin == Some(PinSide::Right))
        {
            slot.pin_offset = offset;
            offset += slot.width;
        }
        layout.right_width = offset;

        if let Some(last_left) = layout.slots.iter_mut().rfind(|s| s.pin == Some(PinSide::Left)) {
            last_left.pin_boundary = true;
        }
        if let Some(first_right) = layout.slots.iter_mut().find(|s| s.pin == Some(PinSide::Right)) {
            first_right.pin_boundary = true;
        }
        layout
    }

    pub fn slot(&self, id: &str) -> Option<&ColumnSlot> {
        self.slots.iter().find(|slot| slot.id.as_str() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{find_column, fixtures::person_columns};

    #[test]
    fn unpinned_columns_follow_definition_order() {
        let columns = person_columns();
        let layout = ColumnLayout::project(&columns, &TableState::default());
        let ids: Vec<&str> = layout.slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["select", "name", "role", "salary", "joined", "active"]);
        assert_eq!(layout.slot("name").unwrap().x, 36.0);
        assert!(layout.slots.iter().all(|s| !s.pin_boundary));
    }

    #[test]
    fn pinned_offsets_are_cumulative_widths() {
        let columns = person_columns();
        let mut state = TableState::default();
        state.pinning.pin("select".into(), Some(PinSide::Left));
        state.pinning.pin("name".into(), Some(PinSide::Left));
        state.pinning.pin("salary".into(), Some(PinSide::Right));
        state.pinning.pin("active".into(), Some(PinSide::Right));

        let layout = ColumnLayout::project(&columns, &state);
        let ids: Vec<&str> = layout.slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["select", "name", "role", "joined", "salary", "active"]);

        let name = layout.slot("name").unwrap();
        assert_eq!(name.pin_offset, 36.0);
        assert!(name.pin_boundary);
        assert!(!layout.slot("select").unwrap().pin_boundary);

        // right pins count from the right edge
        let salary = layout.slot("salary").unwrap();
        assert_eq!(salary.pin_offset, 90.0);
        assert!(salary.pin_boundary);
        assert_eq!(layout.slot("active").unwrap().pin_offset, 0.0);
        assert_eq!(layout.left_width, 186.0);
        assert_eq!(layout.right_width, 210.0);
    }

    #[test]
    fn offsets_track_resizes() {
        let columns = person_columns();
        let mut state = TableState::default();
        state.pinning.pin("select".into(), Some(PinSide::Left));
        state.pinning.pin("name".into(), Some(PinSide::Left));
        state.pinning.pin("role".into(), Some(PinSide::Left));
        let name = find_column(&columns, "name").unwrap();

        state.sizing.set(name, 250.0);
        let layout = ColumnLayout::project(&columns, &state);
        assert_eq!(layout.slot("role").unwrap().pin_offset, 36.0 + 250.0);

        state.sizing.reset("name");
        let layout = ColumnLayout::project(&columns, &state);
        assert_eq!(layout.slot("role").unwrap().pin_offset, 36.0 + 150.0);
    }

    #[test]
    fn hidden_columns_take_no_space() {
        let columns = person_columns();
        let mut state = TableState::default();
        state.visibility.set_visible(find_column(&columns, "role").unwrap(), false);
        let layout = ColumnLayout::project(&columns, &state);
        assert!(layout.slot("role").is_none());
        assert_eq!(layout.total_width, 36.0 + 150.0 + 120.0 + 150.0 + 90.0);
    }
}
