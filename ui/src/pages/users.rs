//! The user management page.
//!
//! Rendering only reads the [`StateCtx`]. Every interaction becomes a
//! [`UsersAction`] that is applied after the frame is drawn.

use chrono::NaiveDate;
use datagrid_business::{
    GridConfig,
    grid::{ColumnDef, GridRecord, RowView, resolve_control, row_views, selected_ids_json},
    users::{
        FilteredUsersCompute, Role, User, UsersAction, UsersBodyCompute, UsersDataset,
        UsersFilter, UsersLayoutCompute, UsersPageState, UsersRowModelCompute, UsersSelection,
        UsersSelectionCompute, UsersTable, apply_users_action, poll_users_page,
    },
};
use datagrid_states::{StateCtx, Time};
use egui::{Align, Button, Color32, FontId, Layout, RichText, Sense, TextEdit, Ui, vec2};
use egui_extras::{Size, StripBuilder};

use crate::{
    state::State,
    utils::colors::{COLOR_GREEN, COLOR_RED, role_color},
    widgets::{
        ColumnMenuEvent, EditDialogEvent, FilterAction, FilterBuffers, GridCells, GridEvent,
        GridView, PaginationEvent, action_bar, column_menu, edit_dialog, filter_control,
        pagination, popup_below, selected_ids_window,
    },
};

const TOOLBAR_HEIGHT: f32 = 36.0;
const FOOTER_HEIGHT: f32 = 32.0;
const AVATAR_RADIUS: f32 = 14.0;

/// Draws the page for one frame and applies what the user did.
pub fn users_page(ui: &mut Ui, state: &mut State) {
    if let Some(wait) = poll_users_page(&mut state.ctx) {
        ui.ctx()
            .request_repaint_after(wait.to_std().unwrap_or_default());
    }

    let actions = render(ui, &state.ctx);
    if actions.is_empty() {
        return;
    }
    for action in actions {
        log::debug!("users page action: {action:?}");
        apply_users_action(&mut state.ctx, action);
    }
    ui.ctx().request_repaint();
}

fn render(ui: &mut Ui, ctx: &StateCtx) -> Vec<UsersAction> {
    let Some(view) = UsersView::read(ctx) else {
        log::warn!("users page computes are not recorded");
        return Vec::new();
    };

    let mut actions = Vec::new();
    StripBuilder::new(ui)
        .size(Size::exact(TOOLBAR_HEIGHT))
        .size(Size::remainder().at_least(120.0))
        .size(Size::exact(FOOTER_HEIGHT))
        .vertical(|mut strip| {
            strip.cell(|ui| view.toolbar(ui, &mut actions));
            strip.cell(|ui| view.grid(ui, &mut actions));
            strip.cell(|ui| view.footer(ui, &mut actions));
        });
    view.overlays(ui.ctx(), &mut actions);
    actions
}

/// Everything the page reads in one frame.
struct UsersView<'a> {
    dataset: &'a UsersDataset,
    filter: &'a UsersFilter,
    table: &'a UsersTable,
    selection: &'a UsersSelection,
    page: &'a UsersPageState,
    config: &'a GridConfig,
    filtered: &'a FilteredUsersCompute,
    rows: &'a UsersRowModelCompute,
    layout: &'a UsersLayoutCompute,
    body: &'a UsersBodyCompute,
    selected: &'a UsersSelectionCompute,
    today: NaiveDate,
}

impl<'a> UsersView<'a> {
    fn read(ctx: &'a StateCtx) -> Option<Self> {
        Some(Self {
            dataset: ctx.state::<UsersDataset>(),
            filter: ctx.state::<UsersFilter>(),
            table: ctx.state::<UsersTable>(),
            selection: ctx.state::<UsersSelection>(),
            page: ctx.state::<UsersPageState>(),
            config: ctx.state::<GridConfig>(),
            filtered: ctx.cached::<FilteredUsersCompute>()?,
            rows: ctx.cached::<UsersRowModelCompute>()?,
            layout: ctx.cached::<UsersLayoutCompute>()?,
            body: ctx.cached::<UsersBodyCompute>()?,
            selected: ctx.cached::<UsersSelectionCompute>()?,
            today: ctx.state::<Time>().now().date_naive(),
        })
    }

    fn toolbar(&self, ui: &mut Ui, actions: &mut Vec<UsersAction>) {
        ui.horizontal_centered(|ui| {
            let mut search = self.page.search.text().to_owned();
            let response = ui.add(
                TextEdit::singleline(&mut search)
                    .hint_text("Search...")
                    .desired_width(220.0),
            );
            if response.changed() {
                actions.push(UsersAction::SearchEdited(search));
            }

            self.role_menu(ui, actions);

            let show_filters = self.table.table.show_filters;
            if ui.selectable_label(show_filters, "Filters").clicked() {
                actions.push(UsersAction::ToggleShowFilters);
            }
            if !self.table.table.column_filters.is_empty() && ui.button("Clear Filters").clicked() {
                actions.push(UsersAction::ClearColumnFilters);
            }

            let event = column_menu(
                ui,
                &self.table.columns,
                &self.table.table,
                self.table.options.pinnable_columns,
            );
            match event {
                Some(ColumnMenuEvent::Toggle(column)) => actions.push(UsersAction::ToggleColumn(column)),
                Some(ColumnMenuEvent::Pin { column, side }) => {
                    actions.push(UsersAction::Pin { column, side });
                }
                None => {}
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("⟳ Reload").clicked() {
                    actions.push(UsersAction::Reload);
                }
                let loading = ui
                    .selectable_label(self.dataset.loading, "⏯ Loading")
                    .on_hover_text("Toggle the loading state");
                if loading.clicked() {
                    actions.push(UsersAction::ToggleLoading);
                }
                ui.weak(format!("{} users", self.dataset.len()));
            });
        });
    }

    fn role_menu(&self, ui: &mut Ui, actions: &mut Vec<UsersAction>) {
        let roles = &self.filter.roles;
        let label = if roles.is_empty() {
            String::from("Role")
        } else {
            format!("Role ({})", roles.len())
        };
        let button = ui.button(label);
        let mut open = self.page.role_menu_open;
        if button.clicked() {
            open = !open;
        }

        let id = ui.make_persistent_id("role_menu");
        popup_below(ui, id, &button, &mut open, |ui, _open| {
            for role in Role::ALL {
                let mut checked = roles.contains(&role);
                let text = format!("{role} ({})", self.filtered.role_count(role));
                if ui.checkbox(&mut checked, text).changed() {
                    actions.push(UsersAction::ToggleRole(role));
                }
            }
        });

        if open != self.page.role_menu_open {
            actions.push(UsersAction::RoleMenu(open));
        }
    }

    fn grid(&self, ui: &mut Ui, actions: &mut Vec<UsersAction>) {
        let rows = row_views(&self.rows.model, &self.selection.rows, &self.table.table);
        let mut cells = UserCells {
            view: self,
            actions: Vec::new(),
        };

        let events = GridView {
            id_salt: "users_grid",
            columns: &self.table.columns,
            layout: &self.layout.layout,
            table: &self.table.table,
            options: &self.table.options,
            body: &self.body.mode,
            rows: &rows,
            page_check: self.selected.page_check,
        }
        .show(ui, &mut cells);

        actions.append(&mut cells.actions);
        actions.extend(events.into_iter().map(|event| match event {
            GridEvent::ToggleRow(id) => UsersAction::ToggleRow(id),
            GridEvent::TogglePage => UsersAction::TogglePage,
            GridEvent::Sort { column, multi } => UsersAction::Sort { column, multi },
            GridEvent::Resize { column, delta } => UsersAction::Resize { column, delta },
            GridEvent::ResetWidth(column) => UsersAction::ResetWidth(column),
        }));
    }

    fn footer(&self, ui: &mut Ui, actions: &mut Vec<UsersAction>) {
        let model = &self.rows.model;
        let event = pagination(
            ui,
            &model.pagination,
            model.filtered_count,
            &self.config.page_size_choices,
        );
        match event {
            Some(PaginationEvent::Move(step)) => actions.push(UsersAction::Page(step)),
            Some(PaginationEvent::PageSize(size)) => actions.push(UsersAction::PageSize(size)),
            None => {}
        }
    }

    fn overlays(&self, ctx: &egui::Context, actions: &mut Vec<UsersAction>) {
        let closed = action_bar(ctx, self.selected.action_bar, |ui| {
            if ui.button("Active").clicked() {
                actions.push(UsersAction::ActivateSelected);
            }
            if ui.button("Disable").clicked() {
                actions.push(UsersAction::DisableSelected);
            }
            let update = ui
                .add_enabled(self.selected.single.is_some(), Button::new("Update"))
                .on_disabled_hover_text("Select exactly one user");
            if update.clicked() {
                actions.push(UsersAction::OpenEdit);
            }
            if ui.button("Selected Ids").clicked() {
                actions.push(UsersAction::ShowSelectedIds(true));
            }
        });
        if closed {
            actions.push(UsersAction::ClearSelection);
        }

        if self.page.show_selected_ids {
            let json = selected_ids_json(&self.selected.selected_ids);
            if !selected_ids_window(ctx, &json) {
                actions.push(UsersAction::ShowSelectedIds(false));
            }
        }

        if let Some(form) = &self.page.edit
            && let Some(event) = edit_dialog(ctx, form)
        {
            actions.push(match event {
                EditDialogEvent::Changed(form) => UsersAction::EditChanged(form),
                EditDialogEvent::Submit => UsersAction::SubmitEdit,
                EditDialogEvent::Reset => UsersAction::ResetEdit,
                EditDialogEvent::Cancel => UsersAction::CancelEdit,
            });
        }
    }

    fn user(&self, row: &RowView) -> Option<&'a User> {
        self.dataset.users().get(row.record)
    }
}

/// Cell, filter and detail renderers of the users grid.
struct UserCells<'v, 'a> {
    view: &'v UsersView<'a>,
    actions: Vec<UsersAction>,
}

impl GridCells for UserCells<'_, '_> {
    fn cell(&mut self, ui: &mut Ui, column: &ColumnDef, row: &RowView) {
        let Some(user) = self.view.user(row) else {
            return;
        };
        match column.id.as_str() {
            "username" => {
                let chevron = if row.expanded { "⏷" } else { "⏵" };
                if ui.small_button(chevron).clicked() {
                    self.actions.push(UsersAction::ToggleExpanded(row.id));
                }
                avatar(ui, user);
                ui.vertical(|ui| {
                    ui.add_space(2.0);
                    ui.strong(&user.username);
                    ui.weak(RichText::new(&user.email).small());
                });
            }
            "role" => badge(ui, user.role.as_str(), role_color(user.role)),
            "national" => {
                ui.weak(user.national.code());
                ui.label(user.national.label());
            }
            "salary" => {
                ui.label(RichText::new(format!("${}", user.salary)).monospace());
            }
            "join_date" => {
                ui.label(user.join_date.format("%Y/%m/%d").to_string());
            }
            "active" => {
                let color = if user.active { COLOR_GREEN } else { COLOR_RED };
                badge(ui, user.status_label(), color);
            }
            other => {
                ui.label(user.cell(other).to_string());
            }
        }
    }

    fn filter(&mut self, ui: &mut Ui, column: &ColumnDef) {
        let view = self.view;
        let control = resolve_control(
            column,
            view.table.table.column_filters.get(&column.id),
            view.rows.model.facets(&column.id),
            view.config.facet_cap,
        );
        let inputs = &view.page.filter_inputs;
        let buffers = FilterBuffers {
            text: inputs.text_of(column.id),
            min: inputs.min_of(column.id),
            max: inputs.max_of(column.id),
        };

        let column_id = column.id;
        let action = match filter_control(ui, column, &control, buffers, view.today) {
            Some(FilterAction::Text(text)) => UsersAction::FilterTextEdited {
                column: column_id,
                text,
            },
            Some(FilterAction::Min(text)) => UsersAction::FilterMinEdited {
                column: column_id,
                text,
            },
            Some(FilterAction::Max(text)) => UsersAction::FilterMaxEdited {
                column: column_id,
                text,
            },
            Some(FilterAction::Edit(edit)) => UsersAction::Filter {
                column: column_id,
                edit,
            },
            None => return,
        };
        self.actions.push(action);
    }

    fn expanded(&mut self, ui: &mut Ui, row: &RowView) {
        let Some(user) = self.view.user(row) else {
            return;
        };
        egui::Grid::new(("user_details", row.id))
            .num_columns(4)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                ui.weak("ID");
                ui.monospace(user.id.as_str());
                ui.weak("Email");
                ui.label(&user.email);
                ui.end_row();

                ui.weak("Joined");
                ui.label(user.join_date.format("%Y/%m/%d %H:%M").to_string());
                ui.weak("Avatar");
                ui.label(&user.avatar);
                ui.end_row();
            });
    }
}

fn avatar(ui: &mut Ui, user: &User) {
    let (rect, _) = ui.allocate_exact_size(vec2(AVATAR_RADIUS * 2.0, AVATAR_RADIUS * 2.0), Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), AVATAR_RADIUS, role_color(user.role).gamma_multiply(0.6));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        user.initials(),
        FontId::proportional(11.0),
        Color32::WHITE,
    );
}

fn badge(ui: &mut Ui, text: &str, color: Color32) {
    egui::Frame::NONE
        .fill(color.gamma_multiply(0.15))
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).small().strong());
        });
}
