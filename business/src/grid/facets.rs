use std::collections::BTreeMap;

use ustr::Ustr;

use super::{ColumnDef, GridRecord};

/// Default cap on the number of distinct values offered as filter options.
pub const FACET_CAP: usize = 5000;

/// Distinct values and numeric bounds of one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFacets {
    unique: BTreeMap<String, usize>,
    min_max: Option<(f64, f64)>,
}

impl ColumnFacets {
    /// Distinct values in ascending order, at most `cap` of them.
    pub fn sorted_values(&self, cap: usize) -> Vec<String> {
        self.unique.keys().take(cap).cloned().collect()
    }

    pub fn count(&self, value: &str) -> usize {
        self.unique.get(value).copied().unwrap_or_default()
    }

    pub fn distinct(&self) -> usize {
        self.unique.len()
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.min_max
    }

    fn push(&mut self, cell: &super::CellValue) {
        if let Some(key) = cell.facet_key() {
            *self.unique.entry(key).or_default() += 1;
        }
        if let Some(number) = cell.as_number() {
            self.min_max = Some(match self.min_max {
                Some((min, max)) => (min.min(number), max.max(number)),
                None => (number, number),
            });
        }
    }
}

/// Facets of every data column over `rows`.
pub fn collect_facets<'a, R, I>(rows: I, columns: &[ColumnDef]) -> BTreeMap<Ustr, ColumnFacets>
where
    R: GridRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let data_columns: Vec<&ColumnDef> = columns.iter().filter(|c| c.is_data()).collect();
    let mut facets: BTreeMap<Ustr, ColumnFacets> = data_columns
        .iter()
        .map(|column| (column.id, ColumnFacets::default()))
        .collect();
    for row in rows {
        for column in &data_columns {
            if let Some(entry) = facets.get_mut(&column.id) {
                entry.push(&row.cell(&column.id));
            }
        }
    }
    facets
}
