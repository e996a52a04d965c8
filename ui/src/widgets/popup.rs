//! Floating panels anchored below a button.
//!
//! [`popup_below`] draws the panel for a caller-owned `open` flag and clears
//! it on Escape or a click outside. [`popup_button`] keeps the flag in egui's
//! temporary memory so callers hold no state.

use egui::{Area, Frame, Id, Key, Order, Response, Ui, WidgetText, vec2};

pub fn popup_below<R>(
    ui: &Ui,
    id: Id,
    anchor: &Response,
    open: &mut bool,
    add_contents: impl FnOnce(&mut Ui, &mut bool) -> R,
) -> Option<R> {
    if !*open {
        return None;
    }

    let area = Area::new(id.with("popup"))
        .order(Order::Foreground)
        .fixed_pos(anchor.rect.left_bottom() + vec2(0.0, 4.0))
        .show(ui.ctx(), |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(anchor.rect.width().max(160.0));
                add_contents(ui, open)
            })
        });

    let clicked_outside = ui.input(|i| {
        i.pointer.any_click()
            && i.pointer.interact_pos().is_some_and(|pos| {
                !area.response.rect.contains(pos) && !anchor.rect.contains(pos)
            })
    });
    if clicked_outside || ui.input(|i| i.key_pressed(Key::Escape)) {
        *open = false;
    }
    Some(area.inner.inner)
}

/// Button that toggles a popup. The contents may clear the flag they are handed to close it.
pub fn popup_button<R>(
    ui: &mut Ui,
    id_salt: impl std::hash::Hash,
    text: impl Into<WidgetText>,
    add_contents: impl FnOnce(&mut Ui, &mut bool) -> R,
) -> (Response, Option<R>) {
    let id = ui.make_persistent_id(id_salt);
    let button = ui.button(text);
    let mut open = ui.ctx().data(|d| d.get_temp::<bool>(id)).unwrap_or(false);
    if button.clicked() {
        open = !open;
    }

    let inner = popup_below(ui, id, &button, &mut open, add_contents);
    ui.ctx().data_mut(|d| d.insert_temp(id, open));
    (button, inner)
}
