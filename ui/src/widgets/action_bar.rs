//! Floating bar shown while rows are selected.

use datagrid_business::grid::ActionBarState;
use egui::{Align2, Area, Frame, Order, Ui, vec2};

/// Draws the bar when `state` is visible. Returns `true` when its close button was clicked.
pub fn action_bar(ctx: &egui::Context, state: ActionBarState, add_actions: impl FnOnce(&mut Ui)) -> bool {
    let Some(label) = state.label() else {
        return false;
    };

    let mut closed = false;
    Area::new(egui::Id::new("action_bar"))
        .order(Order::Foreground)
        .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -24.0))
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(label);
                    ui.separator();
                    add_actions(ui);
                    ui.separator();
                    if ui.button("✖").on_hover_text("Clear selection").clicked() {
                        closed = true;
                    }
                });
            });
        });
    closed
}
