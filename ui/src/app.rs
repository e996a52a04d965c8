use chrono::Utc;
use datagrid_business::users::dispose_users_page;
use datagrid_states::Time;

use crate::{pages, state::State};

pub struct DataGridApp {
    state: State,
}

impl DataGridApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }
}

impl eframe::App for DataGridApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state
            .ctx
            .update::<Time>(|time| *time.as_mut() = Utc::now());

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.heading("User Management");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            pages::users_page(ui, &mut self.state);
        });
    }
}

impl Drop for DataGridApp {
    fn drop(&mut self) {
        dispose_users_page(&mut self.state.ctx);
    }
}
