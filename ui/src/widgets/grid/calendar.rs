//! Month view used by the date filter.
//!
//! Drawn inline so it can live inside a popup without opening one itself.

use chrono::{Datelike, Months, NaiveDate};
use datagrid_business::grid::DateRange;
use egui::{RichText, Ui};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Shows one month and returns the day clicked this frame.
///
/// Days inside `range` are highlighted. The shown month is kept in temporary
/// memory and starts at the range start, or at `today`.
pub fn calendar(
    ui: &mut Ui,
    id_salt: impl std::hash::Hash,
    range: &DateRange,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let id = ui.make_persistent_id(id_salt);
    let mut month = ui
        .ctx()
        .data(|d| d.get_temp::<NaiveDate>(id))
        .unwrap_or_else(|| first_of_month(range.from.unwrap_or(today)));

    ui.horizontal(|ui| {
        if ui.small_button("<").clicked() {
            month = month.checked_sub_months(Months::new(1)).unwrap_or(month);
        }
        ui.strong(month.format("%B %Y").to_string());
        if ui.small_button(">").clicked() {
            month = month.checked_add_months(Months::new(1)).unwrap_or(month);
        }
    });

    let mut picked = None;
    egui::Grid::new(id.with("days"))
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            for name in WEEKDAYS {
                ui.weak(name);
            }
            ui.end_row();

            let lead = month.weekday().num_days_from_sunday();
            for _ in 0..lead {
                ui.label("");
            }
            let mut column = lead;
            let mut day = month;
            while day.month() == month.month() {
                let mut text = RichText::new(day.day().to_string());
                if day == today {
                    text = text.underline();
                }
                let in_range = !range.is_empty() && range.contains(day);
                if ui.selectable_label(in_range, text).clicked() {
                    picked = Some(day);
                }

                column += 1;
                if column == 7 {
                    ui.end_row();
                    column = 0;
                }
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
        });

    ui.ctx().data_mut(|d| d.insert_temp(id, month));
    picked
}
