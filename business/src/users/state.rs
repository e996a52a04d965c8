//! States of the user management page.
//!
//! Split so that each compute only wakes up for what it reads: a selection
//! click does not re-run the 20k row filter.

use std::{
    any::Any,
    collections::{BTreeMap, BTreeSet},
};

use chrono::Duration;
use datagrid_states::{CancellationToken, Delay, State, state_assign_impl};
use ustr::Ustr;

use super::{Role, User, UserEditForm, user_columns};
use crate::{
    GridConfig,
    grid::{
        ColumnDef, DebouncedText, FilterEdit, FilterInputs, GridOptions, GridRecord, RowId,
        RowSelection, SortKey, Sorting, TableState, find_column,
    },
};

macro_rules! impl_state {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl State for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }

                fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
                    state_assign_impl(self, new_self);
                }
            }
        )+
    };
}

impl_state!(UsersDataset, UsersFilter, UsersTable, UsersSelection, UsersPageState, UsersInput);

/// Loaded records. Replaced on every (re)load, mutated in place by bulk actions.
#[derive(Debug, Clone, Default)]
pub struct UsersDataset {
    users: Vec<User>,
    index: BTreeMap<RowId, usize>,
    pub loading: bool,
    /// Bumped on every completed load.
    pub generation: u64,
}

impl UsersDataset {
    pub fn new(users: Vec<User>, generation: u64) -> Self {
        let index = users
            .iter()
            .enumerate()
            .map(|(position, user)| (user.id, position))
            .collect();
        Self {
            users,
            index,
            loading: false,
            generation,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: RowId) -> Option<&User> {
        self.position(id).map(|position| &self.users[position])
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut User> {
        self.position(id).map(|position| &mut self.users[position])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Sets `active` on every listed user. Unknown ids are skipped.
    pub fn set_active(&mut self, ids: &[RowId], active: bool) -> usize {
        let mut changed = 0;
        for id in ids {
            if let Some(user) = self.get_mut(*id) {
                user.active = active;
                changed += 1;
            }
        }
        changed
    }
}

/// Committed page-level filters, applied before the grid's column filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersFilter {
    pub search: String,
    /// Empty set means every role.
    pub roles: BTreeSet<Role>,
}

impl UsersFilter {
    pub fn toggle_role(&mut self, role: Role) {
        if !self.roles.remove(&role) {
            self.roles.insert(role);
        }
    }

    pub fn matches(&self, user: &User, search_lower: &str) -> bool {
        (self.roles.is_empty() || self.roles.contains(&user.role))
            && (search_lower.is_empty() || search_text_lower(user).contains(search_lower))
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.roles.is_empty()
    }
}

fn search_text_lower(user: &User) -> String {
    user.search_text().to_lowercase()
}

/// Column definitions and grid state of the users table.
#[derive(Debug, Clone)]
pub struct UsersTable {
    pub columns: Vec<ColumnDef>,
    pub table: TableState,
    pub options: GridOptions,
}

impl UsersTable {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            columns: user_columns(),
            table: TableState::new(config.page_size, Self::default_sorting()),
            options: GridOptions {
                loading_mode: config.loading_mode,
                empty_message: config.empty_message.clone(),
                ..Default::default()
            },
        }
    }

    pub fn default_sorting() -> Sorting {
        Sorting::new(vec![SortKey::desc("username")])
    }

    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        find_column(&self.columns, id)
    }

    /// Applies a filter edit and returns to the first page.
    pub fn apply_edit(&mut self, column: &str, edit: FilterEdit) {
        let Some(def) = find_column(&self.columns, column) else {
            log::warn!("filter edit for unknown column {column}");
            return;
        };
        let value = edit.apply(def.filter, self.table.column_filters.get(column));
        self.table.column_filters.set(def, value);
        self.table.pagination.first();
    }
}

impl Default for UsersTable {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersSelection {
    pub rows: RowSelection,
}

/// Arguments of the page commands. Set before dispatching.
#[derive(Debug, Clone, Default)]
pub struct UsersInput {
    pub row: Option<RowId>,
    pub role: Option<Role>,
    pub filter_edit: Option<(Ustr, FilterEdit)>,
}

/// Timers and dialog state owned by the page.
///
/// Every timer is a child of `cancel_token`; [`UsersPageState::dispose`] stops them all.
#[derive(Debug, Clone)]
pub struct UsersPageState {
    cancel_token: CancellationToken,
    pub load: Delay,
    pub search: DebouncedText,
    pub filter_inputs: FilterInputs,
    pub edit: Option<UserEditForm>,
    pub show_selected_ids: bool,
    pub role_menu_open: bool,
}

impl UsersPageState {
    pub fn new(debounce: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        Self {
            load: Delay::new(cancel_token.child_token()),
            search: DebouncedText::new(String::new(), debounce, cancel_token.child_token()),
            filter_inputs: FilterInputs::new(debounce, cancel_token.child_token()),
            cancel_token,
            edit: None,
            show_selected_ids: false,
            role_menu_open: false,
        }
    }

    pub fn dispose(&mut self) {
        log::debug!("disposing users page timers");
        self.cancel_token.cancel();
        self.load.stop();
        self.edit = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Drops typed-but-uncommitted filter text.
    pub fn reset_inputs(&mut self) {
        self.search.reset();
        self.filter_inputs.reset();
    }
}

impl Default for UsersPageState {
    fn default() -> Self {
        Self::new(GridConfig::default().debounce)
    }
}
