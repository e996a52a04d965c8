//! Turns a column's filter variant and value into a control model, and edits back into values.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::{ColumnDef, ColumnFacets, DateRange, FilterValue, FilterVariant, NumericRange, format_number};

/// Option that clears a single-select filter.
pub const ALL_OPTION: &str = "All";

/// What the filter row should draw for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterControl {
    Text {
        value: String,
        placeholder: String,
    },
    Select {
        selected: Option<String>,
        options: Vec<String>,
    },
    Multi {
        selected: Vec<String>,
        options: Vec<String>,
        searchable: bool,
        summary: String,
    },
    Range {
        range: NumericRange,
        min_placeholder: String,
        max_placeholder: String,
    },
    Date {
        range: DateRange,
        label: String,
    },
}

/// Control model for `column` given its committed value and facets.
pub fn resolve_control(
    column: &ColumnDef,
    value: Option<&FilterValue>,
    facets: Option<&ColumnFacets>,
    facet_cap: usize,
) -> FilterControl {
    let value = value
        .cloned()
        .map(|value| value.normalize(column.filter))
        .unwrap_or_else(|| FilterValue::empty_for(column.filter));
    let options = || {
        column
            .options
            .clone()
            .or_else(|| facets.map(|facets| facets.sorted_values(facet_cap)))
            .unwrap_or_default()
    };

    match value {
        FilterValue::Text(value) => FilterControl::Text {
            value,
            placeholder: String::from("Search..."),
        },
        FilterValue::Select(selected) => FilterControl::Select {
            selected,
            options: options(),
        },
        FilterValue::Multi(selected) => {
            let options = options();
            FilterControl::Multi {
                summary: multi_summary(&selected, &options),
                selected,
                options,
                searchable: column.filter == FilterVariant::Combobox,
            }
        }
        FilterValue::Range(range) => {
            let bounds = facets.and_then(ColumnFacets::min_max);
            FilterControl::Range {
                range,
                min_placeholder: bound_placeholder("Min", bounds.map(|(min, _)| min)),
                max_placeholder: bound_placeholder("Max", bounds.map(|(_, max)| max)),
            }
        }
        FilterValue::Date(range) => FilterControl::Date {
            label: date_label(&range),
            range,
        },
    }
}

fn bound_placeholder(prefix: &str, bound: Option<f64>) -> String {
    match bound {
        Some(bound) => format!("{prefix} ({})", format_number(bound)),
        None => prefix.to_owned(),
    }
}

/// "Multiple" when nothing is picked, up to two labels, then "+N more".
pub fn multi_summary(selected: &[String], options: &[String]) -> String {
    let labels: Vec<&str> = selected
        .iter()
        .filter(|value| options.is_empty() || options.contains(*value))
        .map(String::as_str)
        .collect();
    match labels.len() {
        0 => String::from("Multiple"),
        1 | 2 => labels.join(", "),
        n => format!("{}, +{} more", labels[..2].join(", "), n - 2),
    }
}

/// Case-insensitive option search for the searchable multi-select.
pub fn filter_options<'a>(options: &'a [String], query: &str) -> Vec<&'a String> {
    let query = query.trim().to_lowercase();
    options
        .iter()
        .filter(|option| query.is_empty() || option.to_lowercase().contains(&query))
        .collect()
}

pub fn date_label(range: &DateRange) -> String {
    const FORMAT: &str = "%Y/%m/%d";
    match (range.from, range.to) {
        (Some(from), Some(to)) if from != to => {
            format!("{} - {}", from.format(FORMAT), to.format(FORMAT))
        }
        (Some(from), _) => from.format(FORMAT).to_string(),
        (None, _) => String::from("Pick a date"),
    }
}

/// A user action on a filter control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    Text(String),
    /// Single-select pick. [`ALL_OPTION`] or `None` clears.
    Choose(Option<String>),
    Toggle(String),
    ClearAll,
    SelectAll(Vec<String>),
    Min(Option<f64>),
    Max(Option<f64>),
    Dates(DateRange),
    Today(NaiveDate),
    Clear,
}

impl FilterEdit {
    /// New value of the variant's shape. Edits that do not apply to the variant leave the value as is.
    pub fn apply(self, variant: FilterVariant, current: Option<&FilterValue>) -> FilterValue {
        let current = current
            .cloned()
            .map(|value| value.normalize(variant))
            .unwrap_or_else(|| FilterValue::empty_for(variant));

        match (self, current) {
            (Self::Clear, _) => FilterValue::empty_for(variant),
            (Self::Text(text), FilterValue::Text(_)) => FilterValue::Text(text),
            (Self::Choose(choice), FilterValue::Select(_)) => {
                FilterValue::Select(choice.filter(|choice| choice != ALL_OPTION))
            }
            (Self::Toggle(option), FilterValue::Multi(mut selected)) => {
                match selected.iter().position(|value| *value == option) {
                    Some(index) => {
                        selected.remove(index);
                    }
                    None => selected.push(option),
                }
                FilterValue::Multi(selected)
            }
            (Self::ClearAll, FilterValue::Multi(_)) => FilterValue::Multi(Vec::new()),
            (Self::SelectAll(options), FilterValue::Multi(_)) => FilterValue::Multi(options),
            (Self::Min(min), FilterValue::Range(range)) => {
                FilterValue::Range(NumericRange { min, ..range })
            }
            (Self::Max(max), FilterValue::Range(range)) => {
                FilterValue::Range(NumericRange { max, ..range })
            }
            (Self::Dates(range), FilterValue::Date(_)) => FilterValue::Date(range),
            (Self::Today(today), FilterValue::Date(_)) => FilterValue::Date(DateRange::day(today)),
            (edit, current) => {
                log::debug!("{edit:?} does not apply to {} filter", variant.tag());
                current
            }
        }
    }
}

/// Calendar range click: the first click picks a day, the second closes the range.
pub fn pick_day(range: &DateRange, day: NaiveDate) -> DateRange {
    match (range.from, range.to) {
        (Some(from), None) => DateRange::between(from, day),
        _ => DateRange::new(Some(day), None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    ThisWeek,
    LastWeek,
    TwoWeeksAgo,
    ThreeWeeksAgo,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

impl DatePreset {
    pub const ALL: [Self; 8] = [
        Self::ThisWeek,
        Self::LastWeek,
        Self::TwoWeeksAgo,
        Self::ThreeWeeksAgo,
        Self::ThisMonth,
        Self::LastMonth,
        Self::ThisYear,
        Self::LastYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ThisWeek => "This Week",
            Self::LastWeek => "Last Week",
            Self::TwoWeeksAgo => "Last 2 Week",
            Self::ThreeWeeksAgo => "Last 3 Week",
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::ThisYear => "This Year",
            Self::LastYear => "Last Year",
        }
    }

    /// Weeks start on Sunday. "This" month and year end today.
    pub fn range(self, today: NaiveDate) -> Option<DateRange> {
        let week_of = |weeks_back: u64| -> Option<DateRange> {
            let day = today.checked_sub_days(Days::new(7 * weeks_back))?;
            let start =
                day.checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_sunday())))?;
            let end = start.checked_add_days(Days::new(6))?;
            Some(DateRange::new(Some(start), Some(end)))
        };
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;

        match self {
            Self::ThisWeek => week_of(0),
            Self::LastWeek => week_of(1),
            Self::TwoWeeksAgo => week_of(2),
            Self::ThreeWeeksAgo => week_of(3),
            Self::ThisMonth => Some(DateRange::new(Some(month_start), Some(today))),
            Self::LastMonth => {
                let start = month_start.checked_sub_months(Months::new(1))?;
                Some(DateRange::new(Some(start), month_start.pred_opt()))
            }
            Self::ThisYear => Some(DateRange::new(Some(year_start), Some(today))),
            Self::LastYear => {
                let start = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)?;
                Some(DateRange::new(Some(start), year_start.pred_opt()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{collect_facets, find_column, fixtures::{Person, person_columns}};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn summary_labels() {
        let options = strings(&["A", "B", "C", "D"]);
        assert_eq!(multi_summary(&[], &options), "Multiple");
        assert_eq!(multi_summary(&strings(&["B", "A"]), &options), "B, A");
        assert_eq!(multi_summary(&strings(&["A", "B", "C", "D"]), &options), "A, B, +2 more");
    }

    #[test]
    fn select_all_sentinel_clears() {
        let value = FilterEdit::Choose(Some("STAFF".into())).apply(FilterVariant::Select, None);
        assert_eq!(value, FilterValue::Select(Some("STAFF".into())));
        let value = FilterEdit::Choose(Some(ALL_OPTION.into())).apply(FilterVariant::Select, Some(&value));
        assert!(value.is_noop());
    }

    #[test]
    fn multi_edits() {
        let all = strings(&["INTERN", "STAFF"]);
        let value = FilterEdit::Toggle("STAFF".into()).apply(FilterVariant::Multiple, None);
        assert_eq!(value, FilterValue::Multi(strings(&["STAFF"])));
        let value = FilterEdit::Toggle("STAFF".into()).apply(FilterVariant::Multiple, Some(&value));
        assert!(value.is_noop());
        let value = FilterEdit::SelectAll(all.clone()).apply(FilterVariant::Combobox, None);
        assert_eq!(value, FilterValue::Multi(all));
        let value = FilterEdit::ClearAll.apply(FilterVariant::Combobox, Some(&value));
        assert_eq!(value, FilterValue::Multi(Vec::new()));
    }

    #[test]
    fn range_edits_keep_the_other_bound() {
        let value = FilterEdit::Min(Some(200.0)).apply(FilterVariant::Range, None);
        let value = FilterEdit::Max(Some(400.0)).apply(FilterVariant::Range, Some(&value));
        assert_eq!(value, FilterValue::Range(NumericRange::new(Some(200.0), Some(400.0))));
    }

    #[test]
    fn mismatched_edit_is_ignored() {
        let current = FilterValue::Text("mia".into());
        let value = FilterEdit::Toggle("x".into()).apply(FilterVariant::Text, Some(&current));
        assert_eq!(value, current);
    }

    #[test]
    fn date_today_and_clear() {
        let today = day(2026, 1, 15);
        let value = FilterEdit::Today(today).apply(FilterVariant::Date, None);
        assert_eq!(date_label(&DateRange::day(today)), "2026/01/15");
        let value = FilterEdit::Clear.apply(FilterVariant::Date, Some(&value));
        assert!(value.is_noop());
        assert_eq!(date_label(&DateRange::default()), "Pick a date");
        assert_eq!(
            date_label(&DateRange::between(day(2026, 1, 1), day(2026, 1, 3))),
            "2026/01/01 - 2026/01/03"
        );
    }

    #[test]
    fn calendar_clicks_build_a_range() {
        let first = pick_day(&DateRange::default(), day(2026, 1, 9));
        assert_eq!(first, DateRange::new(Some(day(2026, 1, 9)), None));
        let second = pick_day(&first, day(2026, 1, 2));
        assert_eq!(second, DateRange::between(day(2026, 1, 2), day(2026, 1, 9)));
        assert_eq!(pick_day(&second, day(2026, 1, 20)).to, None);
    }

    #[test]
    fn presets() {
        // Thursday
        let today = day(2026, 1, 15);
        assert_eq!(
            DatePreset::ThisWeek.range(today),
            Some(DateRange::between(day(2026, 1, 11), day(2026, 1, 17)))
        );
        assert_eq!(
            DatePreset::LastWeek.range(today),
            Some(DateRange::between(day(2026, 1, 4), day(2026, 1, 10)))
        );
        assert_eq!(
            DatePreset::LastMonth.range(today),
            Some(DateRange::between(day(2025, 12, 1), day(2025, 12, 31)))
        );
        assert_eq!(
            DatePreset::LastYear.range(today),
            Some(DateRange::between(day(2025, 1, 1), day(2025, 12, 31)))
        );
        assert_eq!(
            DatePreset::ThisMonth.range(today),
            Some(DateRange::between(day(2026, 1, 1), today))
        );
    }

    #[test]
    fn controls_take_options_from_facets() {
        let columns = person_columns();
        let people = vec![
            Person::new("1", "Mia", "STAFF", 120.0),
            Person::new("2", "Bo", "INTERN", 480.0),
        ];
        let facets = collect_facets(people.iter(), &columns);

        let role = find_column(&columns, "role").unwrap();
        let control = resolve_control(role, None, facets.get(&role.id), 5000);
        assert_eq!(
            control,
            FilterControl::Multi {
                selected: Vec::new(),
                options: strings(&["INTERN", "STAFF"]),
                searchable: false,
                summary: "Multiple".into(),
            }
        );

        let salary = find_column(&columns, "salary").unwrap();
        let FilterControl::Range { min_placeholder, max_placeholder, .. } =
            resolve_control(salary, None, facets.get(&salary.id), 5000)
        else {
            panic!("salary should resolve to a range control");
        };
        assert_eq!((min_placeholder.as_str(), max_placeholder.as_str()), ("Min (120)", "Max (480)"));

        // a stored value of the wrong shape shows as empty
        let name = find_column(&columns, "name").unwrap();
        let control = resolve_control(name, Some(&FilterValue::Multi(vec!["x".into()])), None, 5000);
        assert_eq!(
            control,
            FilterControl::Text { value: String::new(), placeholder: "Search...".into() }
        );
    }
}
