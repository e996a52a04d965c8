//! The user management page: mock dataset, page-level filters, bulk actions and the edit dialog.

mod columns;
mod commands;
mod computes;
mod edit_form;
mod mock;
mod page;
mod record;
mod state;

pub use columns::user_columns;
pub use commands::{
    ActivateSelectedUsersCommand, ApplyFilterEditCommand, ClearColumnFiltersCommand,
    ClearSelectionCommand, DisableSelectedUsersCommand, FinishLoadUsersCommand, LoadUsersCommand,
    OpenUserEditCommand, SubmitUserEditCommand, ToggleLoadingCommand, TogglePageSelectionCommand,
    ToggleRoleFilterCommand, ToggleUserSelectionCommand,
};
pub use computes::{
    FilteredUsersCompute, UsersBodyCompute, UsersLayoutCompute, UsersRowModelCompute,
    UsersSelectionCompute,
};
pub use edit_form::{FormError, FormField, UserEditForm, UserPatch};
pub use mock::{earliest_join_date, generate_users};
pub use page::{
    PageMove, UsersAction, apply_users_action, dispose_users_page, poll_users_page,
    register_users_page,
};
pub use record::{ACTIVE_LABEL, DISABLED_LABEL, Nationality, Role, User};
pub use state::{UsersDataset, UsersFilter, UsersInput, UsersPageState, UsersSelection, UsersTable};
