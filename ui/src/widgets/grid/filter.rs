//! One control per filter variant, drawn in the grid's filter row.

use chrono::NaiveDate;
use datagrid_business::grid::{
    ALL_OPTION, ColumnDef, DatePreset, FilterControl, FilterEdit, NumericRange, filter_options,
    format_number, pick_day,
};
use egui::{ComboBox, ScrollArea, TextEdit, Ui};

use super::calendar::calendar;
use crate::widgets::popup_button;

/// What the user did to a filter control this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Free-text input changed; committed after the debounce delay.
    Text(String),
    Min(String),
    Max(String),
    /// Committed right away.
    Edit(FilterEdit),
}

/// Uncommitted input text, when the column has any.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBuffers<'a> {
    pub text: Option<&'a str>,
    pub min: Option<&'a str>,
    pub max: Option<&'a str>,
}

pub fn filter_control(
    ui: &mut Ui,
    column: &ColumnDef,
    control: &FilterControl,
    buffers: FilterBuffers<'_>,
    today: NaiveDate,
) -> Option<FilterAction> {
    match control {
        FilterControl::Text { value, placeholder } => {
            let mut text = buffers.text.map_or_else(|| value.clone(), str::to_owned);
            let response = ui.add(
                TextEdit::singleline(&mut text)
                    .hint_text(placeholder.as_str())
                    .desired_width(f32::INFINITY),
            );
            response.changed().then_some(FilterAction::Text(text))
        }
        FilterControl::Select { selected, options } => {
            select_control(ui, column, selected.as_deref(), options)
        }
        FilterControl::Multi {
            selected,
            options,
            searchable,
            summary,
        } => multi_control(ui, column, selected, options, *searchable, summary),
        FilterControl::Range {
            range,
            min_placeholder,
            max_placeholder,
        } => range_control(ui, range, buffers, min_placeholder, max_placeholder),
        FilterControl::Date { range, label } => {
            let mut action = None;
            popup_button(ui, (column.id, "date"), label.as_str(), |ui, open| {
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        for preset in DatePreset::ALL {
                            if ui.button(preset.label()).clicked()
                                && let Some(range) = preset.range(today)
                            {
                                action = Some(FilterAction::Edit(FilterEdit::Dates(range)));
                                *open = false;
                            }
                        }
                    });
                    ui.separator();
                    ui.vertical(|ui| {
                        if let Some(day) = calendar(ui, (column.id, "calendar"), range, today) {
                            action = Some(FilterAction::Edit(FilterEdit::Dates(pick_day(range, day))));
                        }
                    });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Today").clicked() {
                        action = Some(FilterAction::Edit(FilterEdit::Today(today)));
                        *open = false;
                    }
                    if ui.button("Clear").clicked() {
                        action = Some(FilterAction::Edit(FilterEdit::Clear));
                        *open = false;
                    }
                });
            });
            action
        }
    }
}

fn select_control(
    ui: &mut Ui,
    column: &ColumnDef,
    selected: Option<&str>,
    options: &[String],
) -> Option<FilterAction> {
    let mut action = None;
    ComboBox::from_id_salt((column.id, "select"))
        .selected_text(selected.unwrap_or(ALL_OPTION))
        .width(ui.available_width())
        .height(240.0)
        .show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), ALL_OPTION).clicked() {
                action = Some(FilterAction::Edit(FilterEdit::Choose(None)));
            }
            for option in options {
                if ui
                    .selectable_label(selected == Some(option.as_str()), option.as_str())
                    .clicked()
                {
                    action = Some(FilterAction::Edit(FilterEdit::Choose(Some(option.clone()))));
                }
            }
        });
    action
}

fn multi_control(
    ui: &mut Ui,
    column: &ColumnDef,
    selected: &[String],
    options: &[String],
    searchable: bool,
    summary: &str,
) -> Option<FilterAction> {
    let mut action = None;
    popup_button(ui, (column.id, "multi"), summary, |ui, _open| {
        let query_id = ui.make_persistent_id((column.id, "query"));
        let mut query = ui
            .ctx()
            .data(|d| d.get_temp::<String>(query_id))
            .unwrap_or_default();
        if searchable {
            ui.add(TextEdit::singleline(&mut query).hint_text("Search options..."));
            ui.ctx().data_mut(|d| d.insert_temp(query_id, query.clone()));
        }
        let visible = filter_options(options, &query);

        ui.horizontal(|ui| {
            // Picks every option, not only the ones the query shows.
            if ui.small_button("Select All").clicked() {
                action = Some(FilterAction::Edit(FilterEdit::SelectAll(options.to_vec())));
            }
            if ui.small_button("Clear All").clicked() {
                action = Some(FilterAction::Edit(FilterEdit::ClearAll));
            }
        });
        ui.separator();

        if visible.is_empty() {
            ui.weak("No options");
            return;
        }
        let row_height = ui.spacing().interact_size.y;
        ScrollArea::vertical()
            .max_height(240.0)
            .show_rows(ui, row_height, visible.len(), |ui, rows| {
                for option in &visible[rows] {
                    let mut checked = selected.contains(*option);
                    if ui.checkbox(&mut checked, option.as_str()).changed() {
                        action = Some(FilterAction::Edit(FilterEdit::Toggle((*option).clone())));
                    }
                }
            });
    });
    action
}

fn range_control(
    ui: &mut Ui,
    range: &NumericRange,
    buffers: FilterBuffers<'_>,
    min_placeholder: &str,
    max_placeholder: &str,
) -> Option<FilterAction> {
    let bound_text = |buffer: Option<&str>, bound: Option<f64>| {
        buffer.map_or_else(|| bound.map(format_number).unwrap_or_default(), str::to_owned)
    };
    let mut min = bound_text(buffers.min, range.min);
    let mut max = bound_text(buffers.max, range.max);
    let width = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;

    let mut action = None;
    if ui
        .add(TextEdit::singleline(&mut min).hint_text(min_placeholder).desired_width(width))
        .changed()
    {
        action = Some(FilterAction::Min(min));
    }
    if ui
        .add(TextEdit::singleline(&mut max).hint_text(max_placeholder).desired_width(width))
        .changed()
    {
        action = Some(FilterAction::Max(max));
    }
    action
}
