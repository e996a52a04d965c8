use datagrid_business::{DemoConfig, GridConfig, users::register_users_page};
use datagrid_states::{StateCtx, Time};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        Self::new(GridConfig::default(), DemoConfig::load())
    }
}

impl State {
    pub fn new(grid: GridConfig, demo: DemoConfig) -> Self {
        let mut ctx = StateCtx::new();

        ctx.add_state(Time::default());
        register_users_page(&mut ctx, grid, demo);

        Self { ctx }
    }

    /// State with a fixed clock, a small dataset and no load delay.
    pub fn test(record_count: usize) -> Self {
        let mut ctx = StateCtx::new();

        ctx.add_state(Time::new(test_now()));
        register_users_page(
            &mut ctx,
            GridConfig::default(),
            DemoConfig {
                record_count,
                load_delay: chrono::Duration::zero(),
                seed: Some(7),
            },
        );

        Self { ctx }
    }
}

fn test_now() -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(1_780_000_000, 0).unwrap_or_default()
}
