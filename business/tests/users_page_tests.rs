use chrono::{DateTime, Duration, Utc};
use datagrid_business::{
    DemoConfig, FormField, GridConfig,
    grid::{ActionBarState, BodyMode, CheckState, RowId},
    users::{
        FilteredUsersCompute, Nationality, PageMove, Role, User, UsersAction, UsersBodyCompute,
        UsersDataset, UsersFilter, UsersPageState, UsersRowModelCompute, UsersSelection,
        UsersSelectionCompute, UsersTable, apply_users_action, dispose_users_page,
        poll_users_page, register_users_page,
    },
};
use datagrid_states::{StateCtx, Time};
use ustr::Ustr;

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_768_000_000, 0).expect("valid timestamp")
}

fn demo() -> DemoConfig {
    DemoConfig {
        record_count: 60,
        load_delay: Duration::milliseconds(100),
        seed: Some(42),
    }
}

fn page_ctx() -> StateCtx {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut ctx = StateCtx::new();
    ctx.add_state(Time::new(t0()));
    register_users_page(&mut ctx, GridConfig::default(), demo());
    ctx
}

fn advance(ctx: &mut StateCtx, millis: i64) {
    ctx.update::<Time>(|time| *time.as_mut() += Duration::milliseconds(millis));
    poll_users_page(ctx);
}

fn loaded_ctx() -> StateCtx {
    let mut ctx = page_ctx();
    advance(&mut ctx, 100);
    ctx
}

fn user(id: &str, username: &str, email: &str, role: Role, salary: u32) -> User {
    User {
        id: RowId::from(id),
        username: username.into(),
        avatar: String::new(),
        email: email.into(),
        role,
        active: true,
        join_date: t0(),
        salary,
        national: Nationality::Vietnamese,
    }
}

/// Replaces the generated users and drops the default sort so rows keep dataset order.
fn with_users(users: Vec<User>) -> StateCtx {
    let mut ctx = loaded_ctx();
    ctx.add_state(UsersDataset::new(users, 99));
    ctx.update::<UsersTable>(|table| table.table.sorting.clear());
    ctx.sync_computes();
    ctx
}

fn page_ids(ctx: &StateCtx) -> Vec<RowId> {
    ctx.cached::<UsersRowModelCompute>()
        .expect("row model is recorded")
        .model
        .page_ids
        .clone()
}

fn selection(ctx: &StateCtx) -> &UsersSelectionCompute {
    ctx.cached::<UsersSelectionCompute>()
        .expect("selection compute is recorded")
}

#[test]
fn users_appear_after_load_delay() {
    let mut ctx = page_ctx();
    assert!(ctx.state::<UsersDataset>().loading);
    assert_eq!(
        ctx.cached::<UsersBodyCompute>().unwrap().mode,
        BodyMode::Skeleton { rows: 25 }
    );

    advance(&mut ctx, 50);
    assert!(ctx.state::<UsersDataset>().loading);

    advance(&mut ctx, 50);
    let dataset = ctx.state::<UsersDataset>();
    assert!(!dataset.loading);
    assert_eq!(dataset.len(), 60);
    assert_eq!(ctx.cached::<UsersBodyCompute>().unwrap().mode, BodyMode::Data);
    assert_eq!(page_ids(&ctx).len(), 25);
}

#[test]
fn default_sort_is_username_descending() {
    let ctx = loaded_ctx();
    let dataset = ctx.state::<UsersDataset>();
    let names: Vec<String> = page_ids(&ctx)
        .into_iter()
        .map(|id| dataset.get(id).unwrap().username.to_lowercase())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(names, sorted);
}

#[test]
fn role_filter_keeps_dataset_order() {
    let mut ctx = with_users(vec![
        user("a", "ann", "ann@x.io", Role::Staff, 100),
        user("b", "ben", "ben@x.io", Role::Manager, 100),
        user("c", "cat", "cat@x.io", Role::Staff, 100),
    ]);
    apply_users_action(&mut ctx, UsersAction::ToggleRole(Role::Staff));

    assert_eq!(ctx.cached::<FilteredUsersCompute>().unwrap().rows, vec![0, 2]);
    assert_eq!(page_ids(&ctx), vec![RowId::from("a"), RowId::from("c")]);
    // counts cover the whole dataset
    assert_eq!(
        ctx.cached::<FilteredUsersCompute>().unwrap().role_count(Role::Manager),
        1
    );
}

#[test]
fn search_commits_after_debounce_and_matches_any_attribute() {
    let mut ctx = with_users(vec![
        user("u1", "John", "a@b.com", Role::Staff, 100),
        user("u2", "Mia", "mia@b.com", Role::Staff, 100),
    ]);
    apply_users_action(&mut ctx, UsersAction::SearchEdited("j".into()));
    advance(&mut ctx, 300);
    apply_users_action(&mut ctx, UsersAction::SearchEdited("jo".into()));
    advance(&mut ctx, 300);
    assert_eq!(page_ids(&ctx).len(), 2, "nothing committed before the quiet period");

    advance(&mut ctx, 200);
    assert_eq!(page_ids(&ctx), vec![RowId::from("u1")]);

    apply_users_action(&mut ctx, UsersAction::SearchEdited("MIA@".into()));
    advance(&mut ctx, 500);
    assert_eq!(page_ids(&ctx), vec![RowId::from("u2")]);
}

#[test]
fn search_keeps_surrounding_spaces() {
    let mut ctx = with_users(vec![
        user("u1", "John", "a@b.com", Role::Staff, 100),
        user("u2", "Johnny", "c@d.com", Role::Staff, 100),
    ]);
    apply_users_action(&mut ctx, UsersAction::SearchEdited("john ".into()));
    advance(&mut ctx, 500);
    assert_eq!(page_ids(&ctx), vec![RowId::from("u1")]);

    apply_users_action(&mut ctx, UsersAction::SearchEdited("john".into()));
    advance(&mut ctx, 500);
    assert_eq!(page_ids(&ctx).len(), 2);
}

#[test]
fn salary_range_with_open_max() {
    let mut ctx = with_users(vec![
        user("s1", "one", "1@x.io", Role::Staff, 100),
        user("s2", "two", "2@x.io", Role::Staff, 250),
        user("s3", "three", "3@x.io", Role::Staff, 500),
    ]);
    apply_users_action(
        &mut ctx,
        UsersAction::FilterMinEdited {
            column: Ustr::from("salary"),
            text: "200".into(),
        },
    );
    advance(&mut ctx, 500);
    assert_eq!(page_ids(&ctx), vec![RowId::from("s2"), RowId::from("s3")]);

    apply_users_action(&mut ctx, UsersAction::ClearColumnFilters);
    assert_eq!(page_ids(&ctx).len(), 3);
    let page = ctx.state::<UsersPageState>();
    assert!(!page.filter_inputs.is_pending());
}

#[test]
fn username_filter_also_matches_email() {
    let mut ctx = with_users(vec![
        user("u1", "John", "zed@b.com", Role::Staff, 100),
        user("u2", "Mia", "mia@b.com", Role::Staff, 100),
    ]);
    apply_users_action(
        &mut ctx,
        UsersAction::FilterTextEdited {
            column: Ustr::from("username"),
            text: "ZED".into(),
        },
    );
    advance(&mut ctx, 500);
    assert_eq!(page_ids(&ctx), vec![RowId::from("u1")]);
}

#[test]
fn closing_the_action_bar_clears_selection() {
    let mut ctx = loaded_ctx();
    let first = page_ids(&ctx)[0];
    apply_users_action(&mut ctx, UsersAction::ToggleRow(first));
    assert_eq!(
        selection(&ctx).action_bar,
        ActionBarState::Visible { count: 1 }
    );
    assert_eq!(selection(&ctx).single, Some(first));

    apply_users_action(&mut ctx, UsersAction::ClearSelection);
    assert!(ctx.state::<UsersSelection>().rows.is_empty());
    assert_eq!(selection(&ctx).action_bar, ActionBarState::Hidden);
}

#[test]
fn select_all_covers_the_current_page_only() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::TogglePage);
    assert_eq!(selection(&ctx).page_check, CheckState::Checked);
    assert_eq!(selection(&ctx).selected_ids.len(), 25);

    apply_users_action(&mut ctx, UsersAction::Page(PageMove::Next));
    assert_eq!(selection(&ctx).page_check, CheckState::Unchecked);

    apply_users_action(&mut ctx, UsersAction::Page(PageMove::First));
    let first = page_ids(&ctx)[0];
    apply_users_action(&mut ctx, UsersAction::ToggleRow(first));
    assert_eq!(selection(&ctx).page_check, CheckState::Indeterminate);

    apply_users_action(&mut ctx, UsersAction::TogglePage);
    apply_users_action(&mut ctx, UsersAction::TogglePage);
    assert!(ctx.state::<UsersSelection>().rows.is_empty());
}

#[test]
fn unknown_rows_cannot_be_selected() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::ToggleRow(RowId::from("nobody")));
    assert!(ctx.state::<UsersSelection>().rows.is_empty());
}

#[test]
fn bulk_disable_updates_selected_users() {
    let mut ctx = loaded_ctx();
    let ids: Vec<RowId> = page_ids(&ctx).into_iter().take(3).collect();
    for id in &ids {
        apply_users_action(&mut ctx, UsersAction::ToggleRow(*id));
    }
    apply_users_action(&mut ctx, UsersAction::DisableSelected);
    let dataset = ctx.state::<UsersDataset>();
    assert!(ids.iter().all(|id| !dataset.get(*id).unwrap().active));
    assert!(ctx.state::<UsersSelection>().rows.is_empty());

    for id in &ids {
        apply_users_action(&mut ctx, UsersAction::ToggleRow(*id));
    }
    apply_users_action(&mut ctx, UsersAction::ActivateSelected);
    let dataset = ctx.state::<UsersDataset>();
    assert!(ids.iter().all(|id| dataset.get(*id).unwrap().active));
}

#[test]
fn last_page_is_clamped_when_rows_shrink() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::Page(PageMove::Last));
    assert_eq!(ctx.state::<UsersTable>().table.pagination.page_index, 2);

    ctx.update::<UsersFilter>(|filter| filter.search = "zzz-no-match".into());
    ctx.sync_computes();
    let rows = &ctx.cached::<UsersRowModelCompute>().unwrap().model;
    assert_eq!(rows.page_count, 1);
    assert_eq!(ctx.state::<UsersTable>().table.pagination.page_index, 0);
}

#[test]
fn page_size_change_keeps_the_top_row_visible() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::Page(PageMove::Last));
    apply_users_action(&mut ctx, UsersAction::PageSize(50));
    let rows = &ctx.cached::<UsersRowModelCompute>().unwrap().model;
    assert_eq!(rows.page_count, 2);
    assert_eq!(rows.page_rows.len(), 10);
    assert_eq!(ctx.state::<UsersTable>().table.pagination.page_index, 1);
}

#[test]
fn edit_dialog_validates_then_writes_back() {
    let mut ctx = loaded_ctx();
    let id = page_ids(&ctx)[0];
    apply_users_action(&mut ctx, UsersAction::OpenEdit);
    assert!(ctx.state::<UsersPageState>().edit.is_none(), "needs one selected user");

    apply_users_action(&mut ctx, UsersAction::ToggleRow(id));
    apply_users_action(&mut ctx, UsersAction::OpenEdit);
    let mut form = ctx.state::<UsersPageState>().edit.clone().expect("dialog opens");
    form.salary = "5".into();
    apply_users_action(&mut ctx, UsersAction::EditChanged(Box::new(form)));
    apply_users_action(&mut ctx, UsersAction::SubmitEdit);

    let form = ctx.state::<UsersPageState>().edit.clone().expect("dialog stays open");
    assert!(form.error(FormField::Salary).is_some());
    assert!(form.error(FormField::Username).is_none());

    let mut form = form;
    form.salary = "480".into();
    form.username = "renamed_user".into();
    apply_users_action(&mut ctx, UsersAction::EditChanged(Box::new(form)));
    apply_users_action(&mut ctx, UsersAction::SubmitEdit);
    assert!(ctx.state::<UsersPageState>().edit.is_none());
    let user = ctx.state::<UsersDataset>().get(id).unwrap();
    assert_eq!(user.salary, 480);
    assert_eq!(user.username, "renamed_user");
}

#[test]
fn reload_resets_filters_and_selection() {
    let mut ctx = loaded_ctx();
    let first = page_ids(&ctx)[0];
    apply_users_action(&mut ctx, UsersAction::ToggleRow(first));
    apply_users_action(&mut ctx, UsersAction::ToggleExpanded(first));
    apply_users_action(&mut ctx, UsersAction::ToggleRole(Role::Intern));
    assert!(ctx.state::<UsersTable>().table.is_expanded(first));
    apply_users_action(&mut ctx, UsersAction::Reload);

    assert!(ctx.state::<UsersDataset>().loading);
    assert!(ctx.state::<UsersSelection>().rows.is_empty());
    assert!(ctx.state::<UsersTable>().table.expanded.is_empty());
    advance(&mut ctx, 100);
    let filtered = ctx.cached::<FilteredUsersCompute>().unwrap();
    assert_eq!(filtered.rows.len(), 60);
    assert_eq!(ctx.state::<UsersDataset>().generation, 2);
}

#[test]
fn disposed_page_commits_nothing() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::Reload);
    apply_users_action(&mut ctx, UsersAction::SearchEdited("zzz-no-match".into()));
    dispose_users_page(&mut ctx);
    advance(&mut ctx, 5_000);

    assert!(ctx.state::<UsersDataset>().loading, "load delay was cancelled");
    assert!(ctx.state::<UsersFilter>().search.is_empty(), "search was cancelled");
    assert!(ctx.state::<UsersPageState>().is_disposed());
    assert!(poll_users_page(&mut ctx).is_none());
}

#[test]
fn empty_result_shows_the_empty_view() {
    let mut ctx = loaded_ctx();
    apply_users_action(&mut ctx, UsersAction::SearchEdited("zzz-no-match".into()));
    advance(&mut ctx, 500);
    assert_eq!(
        ctx.cached::<UsersBodyCompute>().unwrap().mode,
        BodyMode::Empty {
            message: "No data available".into()
        }
    );
}
