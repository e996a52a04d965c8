use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use datagrid_states::{CancellationToken, Debounce};
use ustr::Ustr;

use super::{ColumnFilters, FilterEdit, FilterValue, NumericRange, format_number};

/// Text box whose edits commit after a quiet period.
#[derive(Debug, Clone)]
pub struct DebouncedText {
    text: String,
    debounce: Debounce<String>,
}

impl DebouncedText {
    pub fn new(initial: impl Into<String>, delay: Duration, cancel_token: CancellationToken) -> Self {
        Self {
            text: initial.into(),
            debounce: Debounce::new(delay, cancel_token),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buffer bound to the text edit widget. Call [`Self::edited`] after a change.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn edited(&mut self, now: DateTime<Utc>) {
        self.debounce.schedule(self.text.clone(), now);
    }

    pub fn set(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.text = text.into();
        self.edited(now);
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<String> {
        self.debounce.poll(now)
    }

    /// Adopts a value committed elsewhere, unless the user is mid-edit.
    pub fn sync(&mut self, committed: &str) {
        if !self.debounce.is_pending() && self.text != committed {
            self.text = committed.to_owned();
        }
    }

    /// Empties the buffer and drops any pending commit.
    pub fn reset(&mut self) {
        self.text.clear();
        self.debounce.clear();
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.debounce.remaining(now)
    }
}

/// Debounced buffers of the free-text and range filters, keyed by column.
#[derive(Debug, Clone)]
pub struct FilterInputs {
    delay: Duration,
    cancel_token: CancellationToken,
    text: BTreeMap<Ustr, DebouncedText>,
    min: BTreeMap<Ustr, DebouncedText>,
    max: BTreeMap<Ustr, DebouncedText>,
}

impl FilterInputs {
    pub fn new(delay: Duration, cancel_token: CancellationToken) -> Self {
        Self {
            delay,
            cancel_token,
            text: BTreeMap::new(),
            min: BTreeMap::new(),
            max: BTreeMap::new(),
        }
    }

    fn input<'a>(
        inputs: &'a mut BTreeMap<Ustr, DebouncedText>,
        column: Ustr,
        delay: Duration,
        token: &CancellationToken,
    ) -> &'a mut DebouncedText {
        inputs
            .entry(column)
            .or_insert_with(|| DebouncedText::new(String::new(), delay, token.child_token()))
    }

    pub fn text_input(&mut self, column: Ustr) -> &mut DebouncedText {
        Self::input(&mut self.text, column, self.delay, &self.cancel_token)
    }

    pub fn min_input(&mut self, column: Ustr) -> &mut DebouncedText {
        Self::input(&mut self.min, column, self.delay, &self.cancel_token)
    }

    pub fn max_input(&mut self, column: Ustr) -> &mut DebouncedText {
        Self::input(&mut self.max, column, self.delay, &self.cancel_token)
    }

    /// Buffered text of a column's free-text input, if it was ever edited.
    pub fn text_of(&self, column: Ustr) -> Option<&str> {
        self.text.get(&column).map(DebouncedText::text)
    }

    pub fn min_of(&self, column: Ustr) -> Option<&str> {
        self.min.get(&column).map(DebouncedText::text)
    }

    pub fn max_of(&self, column: Ustr) -> Option<&str> {
        self.max.get(&column).map(DebouncedText::text)
    }

    /// Edits whose quiet period has elapsed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<(Ustr, FilterEdit)> {
        let mut edits = Vec::new();
        for (column, input) in &mut self.text {
            if let Some(text) = input.poll(now) {
                edits.push((*column, FilterEdit::Text(text)));
            }
        }
        for (column, input) in &mut self.min {
            if let Some(text) = input.poll(now) {
                edits.push((*column, FilterEdit::Min(NumericRange::parse_bound(&text))));
            }
        }
        for (column, input) in &mut self.max {
            if let Some(text) = input.poll(now) {
                edits.push((*column, FilterEdit::Max(NumericRange::parse_bound(&text))));
            }
        }
        edits
    }

    /// Shortest wait until a pending edit commits.
    pub fn next_deadline(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.text
            .values()
            .chain(self.min.values())
            .chain(self.max.values())
            .filter_map(|input| input.remaining(now))
            .min()
    }

    /// Mirrors committed filters into idle buffers, e.g. after "clear all".
    pub fn sync(&mut self, filters: &ColumnFilters) {
        for (column, input) in &mut self.text {
            let committed = match filters.get(column) {
                Some(FilterValue::Text(text)) => text.as_str(),
                _ => "",
            };
            input.sync(committed);
        }
        let bound = |column: &Ustr, pick: fn(&NumericRange) -> Option<f64>| match filters.get(column) {
            Some(FilterValue::Range(range)) => pick(range).map(format_number).unwrap_or_default(),
            _ => String::new(),
        };
        for (column, input) in &mut self.min {
            input.sync(&bound(column, |range| range.min));
        }
        for (column, input) in &mut self.max {
            input.sync(&bound(column, |range| range.max));
        }
    }

    pub fn reset(&mut self) {
        self.text
            .values_mut()
            .chain(self.min.values_mut())
            .chain(self.max.values_mut())
            .for_each(DebouncedText::reset);
    }

    pub fn is_pending(&self) -> bool {
        self.text
            .values()
            .chain(self.min.values())
            .chain(self.max.values())
            .any(DebouncedText::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    #[test]
    fn only_the_last_edit_commits() {
        let delay = Duration::milliseconds(500);
        let mut input = DebouncedText::new("", delay, CancellationToken::new());
        input.set("j", t0());
        input.set("jo", t0() + Duration::milliseconds(300));
        assert_eq!(input.poll(t0() + Duration::milliseconds(600)), None);
        assert_eq!(
            input.poll(t0() + Duration::milliseconds(800)).as_deref(),
            Some("jo")
        );
        assert_eq!(input.poll(t0() + Duration::seconds(5)), None);
    }

    #[test]
    fn range_bounds_commit_as_edits() {
        let mut inputs = FilterInputs::new(Duration::milliseconds(500), CancellationToken::new());
        let salary = Ustr::from("salary");
        inputs.min_input(salary).set("200", t0());
        inputs.max_input(salary).set("abc", t0());
        assert_eq!(inputs.next_deadline(t0()), Some(Duration::milliseconds(500)));

        let edits = inputs.poll(t0() + Duration::milliseconds(500));
        assert_eq!(
            edits,
            vec![
                (salary, FilterEdit::Min(Some(200.0))),
                (salary, FilterEdit::Max(None)),
            ]
        );
        assert!(!inputs.is_pending());
    }

    #[test]
    fn cancelled_parent_drops_pending_edits() {
        let token = CancellationToken::new();
        let mut inputs = FilterInputs::new(Duration::milliseconds(500), token.clone());
        inputs.text_input(Ustr::from("name")).set("mia", t0());
        token.cancel();
        assert!(inputs.poll(t0() + Duration::seconds(1)).is_empty());
    }

    #[test]
    fn idle_buffers_follow_committed_filters() {
        let mut inputs = FilterInputs::new(Duration::milliseconds(500), CancellationToken::new());
        let name = Ustr::from("name");
        inputs.text_input(name).set("mia", t0());
        inputs.poll(t0() + Duration::seconds(1));
        inputs.sync(&ColumnFilters::new());
        assert_eq!(inputs.text_input(name).text(), "");
    }
}
