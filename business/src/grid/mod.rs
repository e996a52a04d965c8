//! Rendering-free data grid: filter values, selection, row model and layout.

mod action_bar;
mod body;
mod column;
mod facets;
mod filter;
mod input;
mod layout;
mod resolver;
mod row_model;
mod selection;
mod table_state;
mod value;

#[cfg(test)]
pub(crate) mod fixtures;

pub use action_bar::{ActionBarState, selected_ids_json};
pub use body::{BodyMode, GridOptions, LoadingMode, RowView, row_views};
pub use column::{Align, ColumnDef, ColumnKind, FilterVariant, find_column};
pub use facets::{ColumnFacets, FACET_CAP, collect_facets};
pub use filter::{ColumnFilters, DateRange, FilterValue, NumericRange};
pub use input::{DebouncedText, FilterInputs};
pub use layout::{ColumnLayout, ColumnSlot};
pub use resolver::{
    ALL_OPTION, DatePreset, FilterControl, FilterEdit, date_label, filter_options, multi_summary,
    pick_day, resolve_control,
};
pub use row_model::{RowModel, build_row_model};
pub use selection::{CheckState, RowSelection};
pub use table_state::{
    ColumnPinning, ColumnSizing, ColumnVisibility, Pagination, PinSide, SortDirection, SortKey,
    Sorting, TableState,
};
pub use value::{CellValue, GridRecord, RowId, format_number};
