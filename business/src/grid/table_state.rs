use std::collections::{BTreeMap, BTreeSet};

use ustr::Ustr;

use super::{ColumnDef, ColumnFilters, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Ustr,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<Ustr>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }

    pub fn desc(column: impl Into<Ustr>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }

    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Ordered sort keys. The first key is the primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sorting {
    keys: Vec<SortKey>,
}

impl Sorting {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn direction(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|key| key.column.as_str() == column)
            .map(SortKey::direction)
    }

    /// Position of the column among the keys, for multi-sort badges.
    pub fn index(&self, column: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.column.as_str() == column)
    }

    /// Header click: asc, then desc, then unsorted.
    ///
    /// With `multi` the column is cycled in place and other keys are kept;
    /// otherwise it becomes the only key.
    pub fn cycle(&mut self, column: Ustr, multi: bool) {
        let next = match self.direction(&column) {
            None => Some(false),
            Some(SortDirection::Asc) => Some(true),
            Some(SortDirection::Desc) => None,
        };
        if !multi {
            self.keys.retain(|key| key.column == column);
        }
        match (next, self.index(&column)) {
            (Some(desc), Some(index)) => self.keys[index].desc = desc,
            (Some(desc), None) => self.keys.push(SortKey { column, desc }),
            (None, Some(index)) => {
                self.keys.remove(index);
            }
            (None, None) => {}
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(25)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Never zero, so an empty table still shows "page 1 of 1".
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    /// Pulls the index back inside the last page.
    pub fn clamp(&mut self, total: usize) {
        self.page_index = self.page_index.min(self.page_count(total) - 1);
    }

    pub fn page_range(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.can_next(total) {
            self.page_index += 1;
        }
    }

    pub fn last(&mut self, total: usize) {
        self.page_index = self.page_count(total) - 1;
    }

    /// Keeps the first visible row on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let top_row = self.page_index * self.page_size;
        self.page_size = page_size;
        self.page_index = top_row / page_size;
    }

    /// "1 - 25 of 200"
    pub fn range_label(&self, total: usize) -> String {
        let range = self.page_range(total);
        if range.is_empty() {
            return format!("0 of {total}");
        }
        format!("{} - {} of {total}", range.start + 1, range.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPinning {
    pub left: Vec<Ustr>,
    pub right: Vec<Ustr>,
}

impl ColumnPinning {
    pub fn side(&self, column: &str) -> Option<PinSide> {
        if self.left.iter().any(|id| id.as_str() == column) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|id| id.as_str() == column) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// `None` unpins.
    pub fn pin(&mut self, column: Ustr, side: Option<PinSide>) {
        self.left.retain(|id| *id != column);
        self.right.retain(|id| *id != column);
        match side {
            Some(PinSide::Left) => self.left.push(column),
            Some(PinSide::Right) => self.right.push(column),
            None => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Width overrides set by resizing. Columns without one use their default width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSizing {
    widths: BTreeMap<Ustr, f32>,
}

impl ColumnSizing {
    pub fn width(&self, column: &ColumnDef) -> f32 {
        column.clamp_width(self.widths.get(&column.id).copied().unwrap_or(column.width))
    }

    pub fn set(&mut self, column: &ColumnDef, width: f32) {
        if !column.resizable {
            return;
        }
        self.widths.insert(column.id, column.clamp_width(width));
    }

    pub fn resize_by(&mut self, column: &ColumnDef, delta: f32) {
        let width = self.width(column) + delta;
        self.set(column, width);
    }

    pub fn reset(&mut self, column: &str) {
        self.widths.remove(&Ustr::from(column));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<Ustr>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column: &str) -> bool {
        !self.hidden.contains(&Ustr::from(column))
    }

    /// Columns that are not hideable always stay visible.
    pub fn set_visible(&mut self, column: &ColumnDef, visible: bool) {
        if visible || !column.hideable {
            self.hidden.remove(&column.id);
        } else {
            self.hidden.insert(column.id);
        }
    }

    pub fn toggle(&mut self, column: &ColumnDef) {
        let visible = self.is_visible(&column.id);
        self.set_visible(column, !visible);
    }
}

/// Everything the user can change about a grid besides the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub sorting: Sorting,
    pub pagination: Pagination,
    pub column_filters: ColumnFilters,
    pub sizing: ColumnSizing,
    pub pinning: ColumnPinning,
    pub visibility: ColumnVisibility,
    /// Explicit column order. Columns not listed keep their definition order after the listed ones.
    pub column_order: Vec<Ustr>,
    pub expanded: BTreeSet<RowId>,
    pub show_filters: bool,
}

impl TableState {
    pub fn new(page_size: usize, sorting: Sorting) -> Self {
        Self {
            sorting,
            pagination: Pagination::new(page_size),
            ..Default::default()
        }
    }

    pub fn ordered<'a>(&self, columns: &'a [ColumnDef]) -> Vec<&'a ColumnDef> {
        let mut ordered: Vec<&ColumnDef> = self
            .column_order
            .iter()
            .filter_map(|id| columns.iter().find(|column| column.id == *id))
            .collect();
        for column in columns {
            if !self.column_order.contains(&column.id) {
                ordered.push(column);
            }
        }
        ordered
    }

    pub fn toggle_expanded(&mut self, id: RowId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: RowId) -> bool {
        self.expanded.contains(&id)
    }

    /// Filters go back to empty; layout choices are kept.
    pub fn reset_filters(&mut self) {
        self.column_filters.clear();
        self.pagination.first();
    }
}
