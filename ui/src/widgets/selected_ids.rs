use egui::{RichText, ScrollArea, Window};

/// Read-only JSON view of the selected row ids. Returns `false` once closed.
pub fn selected_ids_window(ctx: &egui::Context, json: &str) -> bool {
    let mut open = true;
    let mut close_clicked = false;

    Window::new("Selected Ids")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                ui.label(RichText::new(json).monospace());
            });
            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                close_clicked = true;
            }
        });

    open && !close_clicked
}
