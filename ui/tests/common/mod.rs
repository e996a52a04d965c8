use datagrid_ui::DataGridApp;
use datagrid_ui::pages::users_page;
use datagrid_ui::state::State;
use egui_kittest::Harness;

pub struct TestCtx<'a, T = State> {
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }
}

impl TestCtx<'_, State> {
    /// Users page over `record_count` generated users, loaded on the first frame.
    pub fn users_page(record_count: usize) -> Self {
        let harness = Harness::builder()
            .with_size(egui::vec2(1280.0, 800.0))
            .build_ui_state(users_page, State::test(record_count));

        Self { harness }
    }
}

impl TestCtx<'_, DataGridApp> {
    #[allow(unused)]
    pub fn new_app(record_count: usize) -> Self {
        let app = DataGridApp::new(State::test(record_count));
        let harness = Harness::builder()
            .with_size(egui::vec2(1280.0, 800.0))
            .build_eframe(|_| app);

        Self { harness }
    }
}
