//! Modal form for editing the single selected user.

use datagrid_business::{
    FormField,
    users::{Role, UserEditForm},
};
use egui::{ComboBox, RichText, TextEdit, Ui, Window};

use crate::utils::colors::COLOR_RED;

/// Choice that exists only to be rejected by validation.
const AUTO_ROLE: &str = "AUTO";

#[derive(Debug, Clone, PartialEq)]
pub enum EditDialogEvent {
    Changed(Box<UserEditForm>),
    Submit,
    Reset,
    Cancel,
}

pub fn edit_dialog(ctx: &egui::Context, form: &UserEditForm) -> Option<EditDialogEvent> {
    let mut open = true;
    let mut event = None;
    let mut draft = form.clone();

    Window::new("Update User")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("edit_user_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Username");
                    field(ui, &draft, FormField::Username, |ui, draft| {
                        ui.add(TextEdit::singleline(&mut draft.username).desired_width(220.0));
                    }, &mut event);
                    ui.end_row();

                    ui.label("Email");
                    field(ui, &draft, FormField::Email, |ui, draft| {
                        ui.add(TextEdit::singleline(&mut draft.email).desired_width(220.0));
                    }, &mut event);
                    ui.end_row();

                    ui.label("Role");
                    field(ui, &draft, FormField::Role, |ui, draft| {
                        ComboBox::from_id_salt("edit_user_role")
                            .selected_text(draft.role.as_str())
                            .width(220.0)
                            .show_ui(ui, |ui| {
                                let roles = Role::ALL.map(Role::as_str);
                                for choice in std::iter::once(AUTO_ROLE).chain(roles) {
                                    ui.selectable_value(&mut draft.role, choice.to_owned(), choice);
                                }
                            });
                    }, &mut event);
                    ui.end_row();

                    ui.label("Salary");
                    field(ui, &draft, FormField::Salary, |ui, draft| {
                        ui.add(TextEdit::singleline(&mut draft.salary).desired_width(220.0));
                    }, &mut event);
                    ui.end_row();

                    ui.label("Active");
                    let mut active = draft.active;
                    if ui.checkbox(&mut active, "").changed() {
                        draft.active = active;
                        event = Some(EditDialogEvent::Changed(Box::new(draft.clone())));
                    }
                    ui.end_row();
                });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    event = Some(EditDialogEvent::Submit);
                }
                if ui.button("Reset").clicked() {
                    event = Some(EditDialogEvent::Reset);
                }
                if ui.button("Cancel").clicked() {
                    event = Some(EditDialogEvent::Cancel);
                }
            });
        });

    if !open {
        event = Some(EditDialogEvent::Cancel);
    }
    event
}

/// Input plus its validation message. Emits `Changed` when the input edited the draft.
fn field(
    ui: &mut Ui,
    draft: &UserEditForm,
    name: FormField,
    add_input: impl FnOnce(&mut Ui, &mut UserEditForm),
    event: &mut Option<EditDialogEvent>,
) {
    ui.vertical(|ui| {
        let mut edited = draft.clone();
        add_input(ui, &mut edited);
        if edited != *draft {
            *event = Some(EditDialogEvent::Changed(Box::new(edited)));
        }
        if let Some(err) = draft.error(name) {
            ui.label(RichText::new(err.to_string()).color(COLOR_RED).small());
        }
    });
}
