use std::{cmp::Ordering, fmt};

use chrono::{DateTime, NaiveDate, TimeZone};
use ustr::Ustr;

/// Stable identifier of a row across filtering, sorting and paging.
pub type RowId = Ustr;

/// A single attribute of a record, as seen by filters, sorting and facets.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Day of a timestamp. Time of day does not take part in date filtering.
    pub fn day<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::Date(at.date_naive())
    }

    /// String used as the option value of select filters and facet counts.
    pub fn facet_key(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => Some(format_number(*number)),
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Date(day) => Some(day.format("%Y/%m/%d").to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) if number.is_finite() => Some(*number),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(day) => Some(*day),
            _ => None,
        }
    }

    /// Case-insensitive substring test. `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.facet_key()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
            Self::Empty => 4,
        }
    }

    /// Ascending order used by the row model. Empty cells sort last.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.facet_key() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Whole numbers print without a trailing `.0`.
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

/// A row the grid can display.
pub trait GridRecord {
    fn row_id(&self) -> RowId;

    /// Attribute addressed by a column id. Unknown ids yield [`CellValue::Empty`].
    fn cell(&self, column: &str) -> CellValue;

    /// Every attribute joined by spaces, used by free-text search.
    fn search_text(&self) -> String;
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Utc};

    use super::*;

    #[test]
    fn numbers_facet_without_fraction() {
        assert_eq!(CellValue::Number(250.0).facet_key().as_deref(), Some("250"));
        assert_eq!(CellValue::Number(2.5).facet_key().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Empty.facet_key(), None);
    }

    #[test]
    fn day_drops_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let late = Utc.from_utc_datetime(&day.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()));
        assert_eq!(CellValue::day(&late), CellValue::Date(day));
    }

    #[test]
    fn text_sort_ignores_case_then_breaks_ties() {
        let a = CellValue::from("alice");
        let b = CellValue::from("Bob");
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
        assert_eq!(
            CellValue::from("Ann").sort_cmp(&CellValue::from("ann")),
            Ordering::Less
        );
        assert_eq!(CellValue::Empty.sort_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn contains_lowercase_uses_display_text() {
        assert!(CellValue::from("John").contains_lowercase("jo"));
        assert!(CellValue::Number(250.0).contains_lowercase("25"));
        assert!(!CellValue::Empty.contains_lowercase("x"));
        assert!(CellValue::Empty.contains_lowercase(""));
    }
}
