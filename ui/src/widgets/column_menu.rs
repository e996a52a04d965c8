//! Column visibility and pinning menu.

use datagrid_business::grid::{ColumnDef, PinSide, TableState};
use egui::Ui;
use ustr::Ustr;

use super::popup_button;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMenuEvent {
    Toggle(Ustr),
    Pin { column: Ustr, side: Option<PinSide> },
}

const PIN_CHOICES: [(Option<PinSide>, &str); 3] = [
    (Some(PinSide::Left), "Left"),
    (None, "None"),
    (Some(PinSide::Right), "Right"),
];

pub fn column_menu(
    ui: &mut Ui,
    columns: &[ColumnDef],
    table: &TableState,
    pinnable: bool,
) -> Option<ColumnMenuEvent> {
    let mut event = None;
    popup_button(ui, "column_menu", "Columns", |ui, _open| {
        egui::Grid::new("column_menu_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for column in columns.iter().filter(|column| column.is_data()) {
                    let mut visible = table.visibility.is_visible(&column.id);
                    if ui
                        .add_enabled(
                            column.hideable,
                            egui::Checkbox::new(&mut visible, column.title.as_str()),
                        )
                        .changed()
                    {
                        event = Some(ColumnMenuEvent::Toggle(column.id));
                    }

                    ui.horizontal(|ui| {
                        if !(pinnable && column.pinnable) {
                            return;
                        }
                        let current = table.pinning.side(&column.id);
                        for (side, label) in PIN_CHOICES {
                            if ui.selectable_label(current == side, label).clicked() && current != side {
                                event = Some(ColumnMenuEvent::Pin {
                                    column: column.id,
                                    side,
                                });
                            }
                        }
                    });
                    ui.end_row();
                }
            });
    });
    event
}
