//! Derived data of the users page, recomputed by `StateCtx::sync_computes`.

use std::{any::Any, collections::BTreeMap};

use datagrid_states::{Compute, ComputeDeps, Dep, Updater, assign_impl};

use super::{Role, UsersDataset, UsersFilter, UsersSelection, UsersTable};
use crate::grid::{
    ActionBarState, BodyMode, CheckState, ColumnLayout, RowId, RowModel, build_row_model,
};

macro_rules! impl_compute_boilerplate {
    () => {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    };
}

/// Search text and role set applied to the whole dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredUsersCompute {
    /// Indices into [`UsersDataset::users`], in dataset order.
    pub rows: Vec<usize>,
    /// Users per role over the whole dataset.
    pub role_counts: BTreeMap<Role, usize>,
}

impl FilteredUsersCompute {
    pub fn role_count(&self, role: Role) -> usize {
        self.role_counts.get(&role).copied().unwrap_or_default()
    }
}

impl Compute for FilteredUsersCompute {
    impl_compute_boilerplate!();

    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
            .state::<UsersDataset>()
            .state::<UsersFilter>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let dataset = deps.get_state_ref::<UsersDataset>();
        let filter = deps.get_state_ref::<UsersFilter>();
        let search = filter.search.to_lowercase();

        let mut role_counts = BTreeMap::new();
        let mut rows = Vec::new();
        for (index, user) in dataset.users().iter().enumerate() {
            *role_counts.entry(user.role).or_default() += 1;
            if filter.matches(user, &search) {
                rows.push(index);
            }
        }
        updater.set(Self { rows, role_counts });
    }
}

/// Column filters, sorting and the current page over [`FilteredUsersCompute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersRowModelCompute {
    pub model: RowModel,
}

impl Compute for UsersRowModelCompute {
    impl_compute_boilerplate!();

    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
            .state::<UsersDataset>()
            .state::<UsersTable>()
            .compute::<FilteredUsersCompute>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let dataset = deps.get_state_ref::<UsersDataset>();
        let table = deps.get_state_ref::<UsersTable>();
        let filtered = deps.get_compute_ref::<FilteredUsersCompute>();

        let model = build_row_model(dataset.users(), &filtered.rows, &table.columns, &table.table);
        let page_index = model.pagination.page_index;
        if page_index != table.table.pagination.page_index {
            log::debug!("page index clamped to {page_index}");
            updater.mutate::<UsersTable>(move |table| {
                table.table.pagination.page_index = page_index;
            });
        }
        updater.set(Self { model });
    }
}

/// Visible columns with widths and pinned offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersLayoutCompute {
    pub layout: ColumnLayout,
}

impl Compute for UsersLayoutCompute {
    impl_compute_boilerplate!();

    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new().state::<UsersTable>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let table = deps.get_state_ref::<UsersTable>();
        updater.set(Self {
            layout: ColumnLayout::project(&table.columns, &table.table),
        });
    }
}

/// Which of skeleton, spinner, rows or empty message the body shows.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersBodyCompute {
    pub mode: BodyMode,
}

impl Default for UsersBodyCompute {
    fn default() -> Self {
        Self {
            mode: BodyMode::Skeleton { rows: 0 },
        }
    }
}

impl Compute for UsersBodyCompute {
    impl_compute_boilerplate!();

    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
            .state::<UsersDataset>()
            .state::<UsersTable>()
            .compute::<UsersRowModelCompute>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let dataset = deps.get_state_ref::<UsersDataset>();
        let table = deps.get_state_ref::<UsersTable>();
        let rows = deps.get_compute_ref::<UsersRowModelCompute>();
        updater.set(Self {
            mode: BodyMode::resolve(
                dataset.loading,
                table.options.loading_mode,
                rows.model.page_rows.len(),
                table.table.pagination.page_size,
                &table.options.empty_message,
            ),
        });
    }
}

/// Selection aggregates for the header checkbox, the action bar and the edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersSelectionCompute {
    pub page_check: CheckState,
    pub action_bar: ActionBarState,
    pub selected_ids: Vec<RowId>,
    /// The selected user when exactly one is selected.
    pub single: Option<RowId>,
}

impl Compute for UsersSelectionCompute {
    impl_compute_boilerplate!();

    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
            .state::<UsersSelection>()
            .state::<UsersDataset>()
            .compute::<UsersRowModelCompute>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let selection = &deps.get_state_ref::<UsersSelection>().rows;
        let dataset = deps.get_state_ref::<UsersDataset>();
        let page = &deps.get_compute_ref::<UsersRowModelCompute>().model.page_ids;

        let selected_ids = selection.selected_ids();
        let single = match selected_ids.as_slice() {
            [id] if dataset.contains(*id) => Some(*id),
            _ => None,
        };
        updater.set(Self {
            page_check: selection.page_check_state(page),
            action_bar: ActionBarState::from_count(selected_ids.len()),
            selected_ids,
            single,
        });
    }
}
