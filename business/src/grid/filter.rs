//! Filter values and their row predicates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ustr::Ustr;

use super::{CellValue, ColumnDef, FilterVariant, GridRecord, find_column};

/// Closed numeric interval with optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Text that does not parse as a finite number is an absent bound.
    pub fn parse_bound(text: &str) -> Option<f64> {
        text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| min <= value) && self.max.is_none_or(|max| value <= max)
    }
}

/// Day interval. `from` alone selects exactly that day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn day(day: NaiveDate) -> Self {
        Self::new(Some(day), Some(day))
    }

    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        Self::new(Some(a.min(b)), Some(a.max(b)))
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.from, self.to) {
            (None, _) => true,
            (Some(from), None) => day == from,
            (Some(from), Some(to)) => from <= day && day <= to,
        }
    }
}

/// Current value of one column filter. The payload shape follows the column's [`FilterVariant`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    /// `None` is the "All" choice.
    Select(Option<String>),
    Multi(Vec<String>),
    Range(NumericRange),
    Date(DateRange),
}

impl FilterValue {
    /// The value that lets every row through.
    pub fn empty_for(variant: FilterVariant) -> Self {
        match variant {
            FilterVariant::Text => Self::Text(String::new()),
            FilterVariant::Select => Self::Select(None),
            FilterVariant::Multiple | FilterVariant::Combobox => Self::Multi(Vec::new()),
            FilterVariant::Range => Self::Range(NumericRange::default()),
            FilterVariant::Date => Self::Date(DateRange::default()),
        }
    }

    pub fn fits(&self, variant: FilterVariant) -> bool {
        matches!(
            (self, variant),
            (Self::Text(_), FilterVariant::Text)
                | (Self::Select(_), FilterVariant::Select)
                | (Self::Multi(_), FilterVariant::Multiple | FilterVariant::Combobox)
                | (Self::Range(_), FilterVariant::Range)
                | (Self::Date(_), FilterVariant::Date)
        )
    }

    /// A value of the wrong shape becomes the variant's empty value.
    pub fn normalize(self, variant: FilterVariant) -> Self {
        if self.fits(variant) {
            self
        } else {
            log::warn!("filter value {self:?} does not fit {}, clearing", variant.tag());
            Self::empty_for(variant)
        }
    }

    /// True when the value matches every row.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Select(choice) => choice.is_none(),
            Self::Multi(values) => values.is_empty(),
            Self::Range(range) => range.is_unbounded(),
            Self::Date(range) => range.is_empty(),
        }
    }

    /// Predicate for one attribute.
    pub fn matches(&self, cell: &CellValue) -> bool {
        match self {
            Self::Text(text) => cell.contains_lowercase(&text.to_lowercase()),
            Self::Select(None) => true,
            Self::Select(Some(choice)) => cell.facet_key().as_deref() == Some(choice.as_str()),
            Self::Multi(values) => {
                values.is_empty()
                    || cell
                        .facet_key()
                        .is_some_and(|key| values.iter().any(|value| *value == key))
            }
            Self::Range(range) => match cell.as_number() {
                Some(number) => range.contains(number),
                None => range.is_unbounded(),
            },
            Self::Date(range) => match cell.as_date() {
                Some(day) => range.contains(day),
                None => range.is_empty(),
            },
        }
    }
}

/// Committed column filters, keyed by column id.
///
/// No-op values are never stored, so an absent entry and an empty value mean the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFilters {
    values: BTreeMap<Ustr, FilterValue>,
}

impl ColumnFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&FilterValue> {
        self.values.get(&Ustr::from(column))
    }

    /// Normalizes against the column's variant, then stores or removes.
    pub fn set(&mut self, column: &ColumnDef, value: FilterValue) {
        let value = value.normalize(column.filter);
        if value.is_noop() {
            self.values.remove(&column.id);
        } else {
            self.values.insert(column.id, value);
        }
    }

    pub fn remove(&mut self, column: &str) {
        self.values.remove(&Ustr::from(column));
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ustr, &FilterValue)> {
        self.values.iter()
    }

    /// All active filters must match. Filters on unknown columns are ignored.
    pub fn matches<R: GridRecord>(&self, record: &R, columns: &[ColumnDef]) -> bool {
        self.values.iter().all(|(id, value)| {
            let Some(column) = find_column(columns, id) else {
                return true;
            };
            match value {
                FilterValue::Text(text) => {
                    let needle = text.to_lowercase();
                    std::iter::once(&column.id)
                        .chain(column.extra_text_targets.iter())
                        .any(|target| record.cell(target).contains_lowercase(&needle))
                }
                other => other.matches(&record.cell(id)),
            }
        })
    }
}
