//! Page size picker, row range and page navigation under the grid.

use datagrid_business::{grid::Pagination, users::PageMove};
use egui::{Button, ComboBox, Layout, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEvent {
    Move(PageMove),
    PageSize(usize),
}

pub fn pagination(
    ui: &mut Ui,
    pagination: &Pagination,
    total: usize,
    page_size_choices: &[usize],
) -> Option<PaginationEvent> {
    let mut event = None;

    ui.horizontal(|ui| {
        ui.label("Rows per page");
        ComboBox::from_id_salt("page_size")
            .selected_text(pagination.page_size.to_string())
            .width(64.0)
            .show_ui(ui, |ui| {
                for &size in page_size_choices {
                    if ui
                        .selectable_label(size == pagination.page_size, size.to_string())
                        .clicked()
                        && size != pagination.page_size
                    {
                        event = Some(PaginationEvent::PageSize(size));
                    }
                }
            });

        ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
            let can_next = pagination.can_next(total);
            let can_previous = pagination.can_previous();
            // Right-to-left: buttons are added last-first.
            let buttons = [
                ("⏭", can_next, PageMove::Last, "Last page"),
                ("▶", can_next, PageMove::Next, "Next page"),
                ("◀", can_previous, PageMove::Previous, "Previous page"),
                ("⏮", can_previous, PageMove::First, "First page"),
            ];
            for (text, enabled, step, hint) in buttons {
                if ui
                    .add_enabled(enabled, Button::new(text))
                    .on_hover_text(hint)
                    .clicked()
                {
                    event = Some(PaginationEvent::Move(step));
                }
            }
            ui.separator();
            ui.label(format!(
                "Page {} of {}",
                pagination.page_index + 1,
                pagination.page_count(total)
            ));
            ui.separator();
            ui.label(pagination.range_label(total));
        });
    });

    event
}
