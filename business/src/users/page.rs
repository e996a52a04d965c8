//! Wiring of the users page into a [`StateCtx`].
//!
//! Widgets read states and computes during the frame and return
//! [`UsersAction`]s; the page applies them once rendering is done.

use chrono::Duration;
use datagrid_states::{StateCtx, Time};
use ustr::Ustr;

use super::{
    ActivateSelectedUsersCommand, ApplyFilterEditCommand, ClearColumnFiltersCommand,
    ClearSelectionCommand, DisableSelectedUsersCommand, FilteredUsersCompute,
    FinishLoadUsersCommand, LoadUsersCommand, OpenUserEditCommand, Role, SubmitUserEditCommand,
    ToggleLoadingCommand, TogglePageSelectionCommand, ToggleRoleFilterCommand,
    ToggleUserSelectionCommand, UserEditForm, UsersBodyCompute, UsersDataset, UsersFilter,
    UsersInput, UsersLayoutCompute, UsersPageState, UsersRowModelCompute, UsersSelection,
    UsersSelectionCompute, UsersTable,
};
use crate::{
    DemoConfig, GridConfig,
    grid::{FilterEdit, PinSide, RowId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    First,
    Previous,
    Next,
    Last,
}

/// Everything a user can do on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UsersAction {
    ToggleRow(RowId),
    TogglePage,
    ClearSelection,
    ActivateSelected,
    DisableSelected,
    Reload,
    ToggleLoading,
    /// Search box text changed; commits after the debounce delay.
    SearchEdited(String),
    ToggleRole(Role),
    /// Free-text column filter changed; debounced.
    FilterTextEdited { column: Ustr, text: String },
    /// Range bound inputs changed; debounced.
    FilterMinEdited { column: Ustr, text: String },
    FilterMaxEdited { column: Ustr, text: String },
    /// Immediate filter edit (selects, dates, clear buttons).
    Filter { column: Ustr, edit: FilterEdit },
    ClearColumnFilters,
    ToggleShowFilters,
    Sort { column: Ustr, multi: bool },
    Page(PageMove),
    PageSize(usize),
    Resize { column: Ustr, delta: f32 },
    ResetWidth(Ustr),
    Pin { column: Ustr, side: Option<PinSide> },
    ToggleColumn(Ustr),
    ToggleExpanded(RowId),
    ShowSelectedIds(bool),
    RoleMenu(bool),
    OpenEdit,
    EditChanged(Box<UserEditForm>),
    SubmitEdit,
    ResetEdit,
    CancelEdit,
}

/// Registers the page's states, computes and commands, then starts the first load.
pub fn register_users_page(ctx: &mut StateCtx, grid: GridConfig, demo: DemoConfig) {
    let grid = match grid.validate() {
        Ok(()) => grid,
        Err(err) => {
            log::warn!("{err}, using default grid config");
            GridConfig::default()
        }
    };
    if ctx.try_state::<Time>().is_err() {
        ctx.add_state(Time::default());
    }

    ctx.add_state(UsersTable::new(&grid));
    ctx.add_state(UsersPageState::new(grid.debounce));
    ctx.add_state(grid);
    ctx.add_state(demo);
    ctx.add_state(UsersDataset::default());
    ctx.add_state(UsersFilter::default());
    ctx.add_state(UsersSelection::default());
    ctx.add_state(UsersInput::default());

    ctx.record_compute(FilteredUsersCompute::default());
    ctx.record_compute(UsersRowModelCompute::default());
    ctx.record_compute(UsersLayoutCompute::default());
    ctx.record_compute(UsersBodyCompute::default());
    ctx.record_compute(UsersSelectionCompute::default());

    ctx.record_command(LoadUsersCommand);
    ctx.record_command(FinishLoadUsersCommand);
    ctx.record_command(ToggleLoadingCommand);
    ctx.record_command(ToggleUserSelectionCommand);
    ctx.record_command(TogglePageSelectionCommand);
    ctx.record_command(ClearSelectionCommand);
    ctx.record_command(ActivateSelectedUsersCommand);
    ctx.record_command(DisableSelectedUsersCommand);
    ctx.record_command(ApplyFilterEditCommand);
    ctx.record_command(ClearColumnFiltersCommand);
    ctx.record_command(ToggleRoleFilterCommand);
    ctx.record_command(OpenUserEditCommand);
    ctx.record_command(SubmitUserEditCommand);

    if let Err(err) = ctx.verify_deps() {
        log::error!("users page dependency graph is invalid: {err}");
    }
    ctx.dispatch::<LoadUsersCommand>();
}

/// Fires due timers and commits debounced input.
///
/// Returns how long until the next timer is due, for scheduling a repaint.
pub fn poll_users_page(ctx: &mut StateCtx) -> Option<Duration> {
    let now = ctx.state::<Time>().now();
    let mut loaded = false;
    let mut search = None;
    let mut edits = Vec::new();
    ctx.update::<UsersPageState>(|page| {
        loaded = page.load.poll(now);
        search = page.search.poll(now);
        edits = page.filter_inputs.poll(now);
    });

    if loaded {
        ctx.dispatch::<FinishLoadUsersCommand>();
    }
    if let Some(search) = search {
        log::debug!("search committed: {search:?}");
        ctx.update::<UsersFilter>(|filter| filter.search = search);
        ctx.update::<UsersTable>(|table| table.table.pagination.first());
    }
    for (column, edit) in edits {
        log::debug!("filter {column} committed: {edit:?}");
        ctx.update::<UsersTable>(|table| table.apply_edit(&column, edit));
    }

    let filters = ctx.state::<UsersTable>().table.column_filters.clone();
    ctx.update::<UsersPageState>(|page| page.filter_inputs.sync(&filters));
    ctx.sync_computes();

    let page = ctx.state::<UsersPageState>();
    [
        page.load.remaining(now),
        page.search.remaining(now),
        page.filter_inputs.next_deadline(now),
    ]
    .into_iter()
    .flatten()
    .min()
}

/// Cancels every timer of the page. Nothing is committed afterwards.
pub fn dispose_users_page(ctx: &mut StateCtx) {
    ctx.update::<UsersPageState>(UsersPageState::dispose);
}

pub fn apply_users_action(ctx: &mut StateCtx, action: UsersAction) {
    let now = ctx.state::<Time>().now();
    match action {
        UsersAction::ToggleRow(id) => {
            ctx.update::<UsersInput>(|input| input.row = Some(id));
            ctx.dispatch::<ToggleUserSelectionCommand>();
        }
        UsersAction::TogglePage => ctx.dispatch::<TogglePageSelectionCommand>(),
        UsersAction::ClearSelection => ctx.dispatch::<ClearSelectionCommand>(),
        UsersAction::ActivateSelected => ctx.dispatch::<ActivateSelectedUsersCommand>(),
        UsersAction::DisableSelected => ctx.dispatch::<DisableSelectedUsersCommand>(),
        UsersAction::Reload => ctx.dispatch::<LoadUsersCommand>(),
        UsersAction::ToggleLoading => ctx.dispatch::<ToggleLoadingCommand>(),
        UsersAction::SearchEdited(text) => {
            ctx.update::<UsersPageState>(|page| page.search.set(text, now));
        }
        UsersAction::ToggleRole(role) => {
            ctx.update::<UsersInput>(|input| input.role = Some(role));
            ctx.dispatch::<ToggleRoleFilterCommand>();
        }
        UsersAction::FilterTextEdited { column, text } => {
            ctx.update::<UsersPageState>(|page| page.filter_inputs.text_input(column).set(text, now));
        }
        UsersAction::FilterMinEdited { column, text } => {
            ctx.update::<UsersPageState>(|page| page.filter_inputs.min_input(column).set(text, now));
        }
        UsersAction::FilterMaxEdited { column, text } => {
            ctx.update::<UsersPageState>(|page| page.filter_inputs.max_input(column).set(text, now));
        }
        UsersAction::Filter { column, edit } => {
            ctx.update::<UsersInput>(|input| input.filter_edit = Some((column, edit)));
            ctx.dispatch::<ApplyFilterEditCommand>();
        }
        UsersAction::ClearColumnFilters => ctx.dispatch::<ClearColumnFiltersCommand>(),
        UsersAction::ToggleShowFilters => {
            ctx.update::<UsersTable>(|table| table.table.show_filters = !table.table.show_filters);
        }
        UsersAction::Sort { column, multi } => {
            ctx.update::<UsersTable>(|table| table.table.sorting.cycle(column, multi));
        }
        UsersAction::Page(step) => {
            let total = ctx
                .cached::<UsersRowModelCompute>()
                .map(|rows| rows.model.filtered_count)
                .unwrap_or_default();
            ctx.update::<UsersTable>(|table| {
                let pagination = &mut table.table.pagination;
                match step {
                    PageMove::First => pagination.first(),
                    PageMove::Previous => pagination.previous(),
                    PageMove::Next => pagination.next(total),
                    PageMove::Last => pagination.last(total),
                }
            });
        }
        UsersAction::PageSize(size) => {
            ctx.update::<UsersTable>(|table| table.table.pagination.set_page_size(size));
        }
        UsersAction::Resize { column, delta } => ctx.update::<UsersTable>(|table| {
            if let Some(def) = table.column(&column).cloned() {
                table.table.sizing.resize_by(&def, delta);
            }
        }),
        UsersAction::ResetWidth(column) => {
            ctx.update::<UsersTable>(|table| table.table.sizing.reset(&column));
        }
        UsersAction::Pin { column, side } => ctx.update::<UsersTable>(|table| {
            if table.column(&column).is_some_and(|def| def.pinnable) {
                table.table.pinning.pin(column, side);
            }
        }),
        UsersAction::ToggleColumn(column) => ctx.update::<UsersTable>(|table| {
            if let Some(def) = table.column(&column).cloned() {
                table.table.visibility.toggle(&def);
            }
        }),
        UsersAction::ToggleExpanded(id) => {
            ctx.update::<UsersTable>(|table| table.table.toggle_expanded(id));
        }
        UsersAction::ShowSelectedIds(show) => {
            ctx.update::<UsersPageState>(|page| page.show_selected_ids = show);
        }
        UsersAction::RoleMenu(open) => {
            ctx.update::<UsersPageState>(|page| page.role_menu_open = open);
        }
        UsersAction::OpenEdit => ctx.dispatch::<OpenUserEditCommand>(),
        UsersAction::EditChanged(form) => {
            ctx.update::<UsersPageState>(|page| {
                if page.edit.is_some() {
                    page.edit = Some(*form);
                }
            });
        }
        UsersAction::SubmitEdit => ctx.dispatch::<SubmitUserEditCommand>(),
        UsersAction::ResetEdit => ctx.update::<UsersPageState>(|page| {
            if let Some(form) = page.edit.as_mut() {
                form.reset();
            }
        }),
        UsersAction::CancelEdit => ctx.update::<UsersPageState>(|page| page.edit = None),
    }
    ctx.sync_computes();
}
