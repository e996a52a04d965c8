//! Filter, sort and paginate records by index.
//!
//! The source slice is never reordered or cloned: every stage works on indices
//! into it, so a 20k row dataset costs a few `Vec<usize>` per recompute.

use std::collections::BTreeMap;

use ustr::Ustr;

use super::{CellValue, ColumnDef, ColumnFacets, GridRecord, Pagination, RowId, TableState, collect_facets, find_column};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowModel {
    /// Indices into the source slice for the current page, in display order.
    pub page_rows: Vec<usize>,
    pub page_ids: Vec<RowId>,
    /// Rows left after the column filters, across all pages.
    pub filtered_count: usize,
    /// Rows handed to the engine before column filters.
    pub pre_filtered_count: usize,
    /// Pagination with the page index pulled inside the filtered rows.
    pub pagination: Pagination,
    pub page_count: usize,
    /// Facets over the pre-filter rows.
    pub facets: BTreeMap<Ustr, ColumnFacets>,
}

impl RowModel {
    pub fn is_empty(&self) -> bool {
        self.page_rows.is_empty()
    }

    pub fn facets(&self, column: &str) -> Option<&ColumnFacets> {
        self.facets.get(&Ustr::from(column))
    }
}

/// Runs column filters, then a stable multi-key sort, then pagination over `candidates`.
pub fn build_row_model<R: GridRecord>(
    records: &[R],
    candidates: &[usize],
    columns: &[ColumnDef],
    state: &TableState,
) -> RowModel {
    let candidates: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|index| *index < records.len())
        .collect();
    let facets = collect_facets(candidates.iter().map(|index| &records[*index]), columns);

    let filtered: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|index| state.column_filters.matches(&records[*index], columns))
        .collect();

    let sorted = sort_rows(records, filtered, columns, state);

    let mut pagination = state.pagination;
    pagination.clamp(sorted.len());
    let page_rows = sorted[pagination.page_range(sorted.len())].to_vec();
    let page_ids = page_rows.iter().map(|index| records[*index].row_id()).collect();

    RowModel {
        page_rows,
        page_ids,
        filtered_count: sorted.len(),
        pre_filtered_count: candidates.len(),
        page_count: pagination.page_count(sorted.len()),
        pagination,
        facets,
    }
}

fn sort_rows<R: GridRecord>(
    records: &[R],
    rows: Vec<usize>,
    columns: &[ColumnDef],
    state: &TableState,
) -> Vec<usize> {
    let keys: Vec<_> = state
        .sorting
        .keys()
        .iter()
        .filter(|key| find_column(columns, &key.column).is_some_and(ColumnDef::can_sort))
        .collect();
    if keys.is_empty() {
        return rows;
    }

    let mut keyed: Vec<(usize, Vec<CellValue>)> = rows
        .into_iter()
        .map(|index| {
            let cells = keys.iter().map(|key| records[index].cell(&key.column)).collect();
            (index, cells)
        })
        .collect();

    // `sort_by` is stable, so ties keep their incoming order.
    keyed.sort_by(|(_, a), (_, b)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(key, (a, b))| {
                let ordering = a.sort_cmp(b);
                if key.desc { ordering.reverse() } else { ordering }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    keyed.into_iter().map(|(index, _)| index).collect()
}
