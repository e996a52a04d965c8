//! Commands of the users page.
//!
//! UI code sets [`UsersInput`] when a command needs an argument, then
//! dispatches. Commands only write through the [`Updater`].

use datagrid_states::{Command, Dep, Time, Updater};

use super::{
    UserEditForm, UsersDataset, UsersFilter, UsersInput, UsersPageState, UsersRowModelCompute,
    UsersSelection, UsersTable, generate_users,
};
use crate::DemoConfig;

/// Starts a (re)load: clears filters, selection and expanded rows, shows the loading view and arms the delay.
#[derive(Debug, Default)]
pub struct LoadUsersCommand;

impl Command for LoadUsersCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let now = deps.get_state_ref::<Time>().now();
        let delay = deps.get_state_ref::<DemoConfig>().load_delay;
        log::info!("loading users, ready in {} ms", delay.num_milliseconds());

        updater.mutate::<UsersDataset>(|dataset| dataset.loading = true);
        updater.set(UsersFilter::default());
        updater.set(UsersSelection::default());
        updater.mutate::<UsersTable>(|table| {
            table.table.reset_filters();
            table.table.expanded.clear();
        });
        updater.mutate::<UsersPageState>(move |page| {
            page.reset_inputs();
            page.edit = None;
            page.show_selected_ids = false;
            page.load.start(now, delay);
        });
    }
}

/// Replaces the dataset with freshly generated users. Run when the load delay fires.
#[derive(Debug, Default)]
pub struct FinishLoadUsersCommand;

impl Command for FinishLoadUsersCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let config = deps.get_state_ref::<DemoConfig>();
        let today = deps.get_state_ref::<Time>().now().date_naive();
        let generation = deps.get_state_ref::<UsersDataset>().generation + 1;

        let users = generate_users(config.record_count, config.seed, today);
        log::info!("loaded {} users (generation {generation})", users.len());
        updater.set(UsersDataset::new(users, generation));
    }
}

/// Demo switch between the loading view and the data.
#[derive(Debug, Default)]
pub struct ToggleLoadingCommand;

impl Command for ToggleLoadingCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) {
        updater.mutate::<UsersDataset>(|dataset| dataset.loading = !dataset.loading);
    }
}

/// Toggles `UsersInput::row`. Ids that are not in the dataset are ignored.
#[derive(Debug, Default)]
pub struct ToggleUserSelectionCommand;

impl Command for ToggleUserSelectionCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let Some(id) = deps.get_state_ref::<UsersInput>().row else {
            return;
        };
        if !deps.get_state_ref::<UsersDataset>().contains(id) {
            log::debug!("ignoring selection of unknown row {id}");
            return;
        }
        updater.mutate::<UsersSelection>(move |selection| {
            selection.rows.toggle(id);
        });
    }
}

/// Header checkbox: selects the current page, or clears it when fully selected.
#[derive(Debug, Default)]
pub struct TogglePageSelectionCommand;

impl Command for TogglePageSelectionCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let Some(rows) = deps.try_compute_ref::<UsersRowModelCompute>() else {
            return;
        };
        let page = rows.model.page_ids.clone();
        updater.mutate::<UsersSelection>(move |selection| selection.rows.toggle_all_page(&page));
    }
}

/// Closing the action bar.
#[derive(Debug, Default)]
pub struct ClearSelectionCommand;

impl Command for ClearSelectionCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) {
        updater.mutate::<UsersSelection>(|selection| selection.rows.clear());
        updater.mutate::<UsersPageState>(|page| page.show_selected_ids = false);
    }
}

fn set_selected_active(deps: Dep<'_>, updater: &Updater, active: bool) {
    let ids = deps.get_state_ref::<UsersSelection>().rows.selected_ids();
    if ids.is_empty() {
        return;
    }
    log::info!("setting active={active} on {} users", ids.len());
    updater.mutate::<UsersDataset>(move |dataset| {
        dataset.set_active(&ids, active);
    });
    updater.mutate::<UsersSelection>(|selection| selection.rows.clear());
}

#[derive(Debug, Default)]
pub struct ActivateSelectedUsersCommand;

impl Command for ActivateSelectedUsersCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        set_selected_active(deps, &updater, true);
    }
}

#[derive(Debug, Default)]
pub struct DisableSelectedUsersCommand;

impl Command for DisableSelectedUsersCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        set_selected_active(deps, &updater, false);
    }
}

/// Applies `UsersInput::filter_edit` to the column filters.
#[derive(Debug, Default)]
pub struct ApplyFilterEditCommand;

impl Command for ApplyFilterEditCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let Some((column, edit)) = deps.get_state_ref::<UsersInput>().filter_edit.clone() else {
            return;
        };
        log::debug!("filter {column}: {edit:?}");
        updater.mutate::<UsersTable>(move |table| table.apply_edit(&column, edit));
    }
}

/// "Clear filters" button: drops every column filter and any text still being typed.
#[derive(Debug, Default)]
pub struct ClearColumnFiltersCommand;

impl Command for ClearColumnFiltersCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) {
        updater.mutate::<UsersTable>(|table| table.table.reset_filters());
        updater.mutate::<UsersPageState>(|page| page.filter_inputs.reset());
    }
}

/// Toggles `UsersInput::role` in the role filter.
#[derive(Debug, Default)]
pub struct ToggleRoleFilterCommand;

impl Command for ToggleRoleFilterCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let Some(role) = deps.get_state_ref::<UsersInput>().role else {
            return;
        };
        updater.mutate::<UsersFilter>(move |filter| filter.toggle_role(role));
        updater.mutate::<UsersTable>(|table| table.table.pagination.first());
    }
}

/// Opens the update dialog when exactly one user is selected.
#[derive(Debug, Default)]
pub struct OpenUserEditCommand;

impl Command for OpenUserEditCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let selection = &deps.get_state_ref::<UsersSelection>().rows;
        let dataset = deps.get_state_ref::<UsersDataset>();
        let ids = selection.selected_ids();
        let [id] = ids.as_slice() else {
            log::debug!("edit needs exactly one selected user, have {}", ids.len());
            return;
        };
        let Some(user) = dataset.get(*id) else {
            return;
        };
        let form = UserEditForm::from_user(user);
        updater.mutate::<UsersPageState>(move |page| page.edit = Some(form));
    }
}

/// Validates the dialog. Valid edits are written back and close it; errors stay on the form.
#[derive(Debug, Default)]
pub struct SubmitUserEditCommand;

impl Command for SubmitUserEditCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let Some(mut form) = deps.get_state_ref::<UsersPageState>().edit.clone() else {
            return;
        };
        match form.check() {
            Some(patch) => {
                let id = form.user_id;
                log::info!("updating user {id}");
                updater.mutate::<UsersDataset>(move |dataset| {
                    if let Some(user) = dataset.get_mut(id) {
                        patch.apply(user);
                    }
                });
                updater.mutate::<UsersPageState>(|page| page.edit = None);
            }
            None => {
                updater.mutate::<UsersPageState>(move |page| page.edit = Some(form));
            }
        }
    }
}
