//! Painter for the data grid.
//!
//! The grid owns one scroll area. Everything inside is placed by hand from
//! the [`ColumnLayout`]: pinned columns are clamped to the viewport edges,
//! the header stays on top while the body scrolls, and only the rows that
//! intersect the viewport get a child ui.

use datagrid_business::grid::{
    Align as ColumnAlign, BodyMode, CheckState, ColumnDef, ColumnKind, ColumnLayout, ColumnSlot,
    GridOptions, PinSide, RowId, RowView, SortDirection, TableState,
};
use egui::{
    Align, Color32, CursorIcon, FontId, Layout, Pos2, Rect, Sense, Stroke, Ui, UiBuilder,
    WidgetInfo, WidgetType, pos2, vec2,
};
use ustr::Ustr;

use crate::utils::colors::{COLOR_BLUE, COLOR_SKELETON};

pub const HEADER_HEIGHT: f32 = 36.0;
pub const FILTER_ROW_HEIGHT: f32 = 40.0;
pub const EXPANDED_HEIGHT: f32 = 72.0;
const MESSAGE_HEIGHT: f32 = 160.0;
const CELL_PADDING: f32 = 8.0;
const RESIZE_GRAB: f32 = 3.0;

/// Interactions the grid reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    ToggleRow(RowId),
    TogglePage,
    Sort { column: Ustr, multi: bool },
    Resize { column: Ustr, delta: f32 },
    ResetWidth(Ustr),
}

/// Content of the data-driven parts of the grid.
pub trait GridCells {
    fn cell(&mut self, ui: &mut Ui, column: &ColumnDef, row: &RowView);

    /// Filter control under the header of a filterable column.
    fn filter(&mut self, ui: &mut Ui, column: &ColumnDef);

    /// Detail panel below an expanded row.
    fn expanded(&mut self, ui: &mut Ui, row: &RowView);
}

pub struct GridView<'a> {
    pub id_salt: &'a str,
    pub columns: &'a [ColumnDef],
    pub layout: &'a ColumnLayout,
    pub table: &'a TableState,
    pub options: &'a GridOptions,
    pub body: &'a BodyMode,
    pub rows: &'a [RowView],
    pub page_check: CheckState,
}

/// Screen-space frame of one grid pass.
struct GridFrame {
    origin: Pos2,
    view: Rect,
    header_top: f32,
    header_height: f32,
    body_clip: Rect,
    center_clip: Rect,
}

impl GridFrame {
    fn slot_x(&self, slot: &ColumnSlot) -> f32 {
        let natural = self.origin.x + slot.x;
        match slot.pin {
            Some(PinSide::Left) => natural.max(self.view.left() + slot.pin_offset),
            Some(PinSide::Right) => natural.min(self.view.right() - slot.pin_offset - slot.width),
            None => natural,
        }
    }

    fn clip_for(&self, slot: &ColumnSlot, vertical: Rect) -> Rect {
        let horizontal = if slot.pin.is_some() {
            self.view
        } else {
            self.center_clip
        };
        Rect::from_x_y_ranges(horizontal.x_range(), vertical.y_range())
    }

    /// Area under the header for the spinner and the empty message.
    fn message_rect(&self) -> Rect {
        let top = self.origin.y + self.header_height;
        Rect::from_x_y_ranges(self.view.x_range(), top..=top + MESSAGE_HEIGHT)
            .intersect(self.body_clip)
    }
}

impl GridView<'_> {
    pub fn show(self, ui: &mut Ui, cells: &mut dyn GridCells) -> Vec<GridEvent> {
        let mut events = Vec::new();
        let row_height = self.options.row_height();
        let header_height = HEADER_HEIGHT
            + if self.table.show_filters {
                FILTER_ROW_HEIGHT
            } else {
                0.0
            };

        let mut offsets = Vec::with_capacity(self.rows.len());
        let mut data_height = 0.0;
        for row in self.rows {
            offsets.push(data_height);
            data_height += row_height + if row.expanded { EXPANDED_HEIGHT } else { 0.0 };
        }
        let body_height = match self.body {
            BodyMode::Data => data_height,
            BodyMode::Skeleton { rows } => *rows as f32 * row_height,
            BodyMode::Spinner | BodyMode::Empty { .. } => MESSAGE_HEIGHT,
        };

        egui::ScrollArea::both()
            .id_salt(self.id_salt)
            .auto_shrink([false, false])
            .show_viewport(ui, |ui, viewport| {
                let origin = ui.max_rect().min;
                let content = vec2(
                    self.layout.total_width.max(viewport.width()),
                    header_height + body_height,
                );
                ui.allocate_rect(Rect::from_min_size(origin, content), Sense::hover());

                let view = viewport.translate(origin.to_vec2());
                let header_top = if self.options.sticky_header {
                    view.top()
                } else {
                    origin.y
                };
                let body_clip = Rect::from_x_y_ranges(
                    view.x_range(),
                    (header_top + header_height).max(view.top())..=view.bottom(),
                );
                let content_right = view.right().min(origin.x + self.layout.total_width);
                let center_clip = Rect::from_x_y_ranges(
                    (view.left() + self.layout.left_width)..=(content_right - self.layout.right_width),
                    view.y_range(),
                );
                let frame = GridFrame {
                    origin,
                    view,
                    header_top,
                    header_height,
                    body_clip,
                    center_clip,
                };

                match self.body {
                    BodyMode::Data => {
                        self.paint_rows(ui, &frame, &offsets, row_height, cells, &mut events);
                    }
                    BodyMode::Skeleton { rows } => self.paint_skeleton(ui, &frame, *rows, row_height),
                    BodyMode::Spinner => {
                        let rect = frame.message_rect();
                        let mut child = ui.new_child(
                            UiBuilder::new()
                                .max_rect(rect)
                                .layout(Layout::top_down(Align::Center)),
                        );
                        child.add_space(48.0);
                        child.add(egui::Spinner::new().size(24.0));
                        child.label(&self.options.loading_message);
                    }
                    BodyMode::Empty { message } => {
                        let rect = frame.message_rect();
                        let mut child = ui.new_child(
                            UiBuilder::new()
                                .max_rect(rect)
                                .layout(Layout::centered_and_justified(egui::Direction::TopDown)),
                        );
                        child.weak(message.as_str());
                    }
                }

                self.paint_header(ui, &frame, cells, &mut events);
            });

        events
    }

    /// Slots in paint order: scrolling columns first so pinned ones cover them.
    fn paint_order(&self) -> impl Iterator<Item = &ColumnSlot> {
        let slots = &self.layout.slots;
        slots
            .iter()
            .filter(|slot| slot.pin.is_none())
            .chain(slots.iter().filter(|slot| slot.pin.is_some()))
    }

    fn paint_rows(
        &self,
        ui: &mut Ui,
        frame: &GridFrame,
        offsets: &[f32],
        row_height: f32,
        cells: &mut dyn GridCells,
        events: &mut Vec<GridEvent>,
    ) {
        let body_top = frame.origin.y + frame.header_height;
        let visuals = ui.visuals().clone();
        let painter = ui.painter().with_clip_rect(frame.body_clip);

        for (row, offset) in self.rows.iter().zip(offsets) {
            let top = body_top + offset;
            let extent = row_height + if row.expanded { EXPANDED_HEIGHT } else { 0.0 };
            if top + extent < frame.body_clip.top() || top > frame.body_clip.bottom() {
                continue;
            }
            let row_rect = Rect::from_x_y_ranges(frame.view.x_range(), top..=top + row_height);

            let fill = if row.selected {
                visuals.selection.bg_fill.gamma_multiply(0.35)
            } else if self.options.striped && row.position % 2 == 1 {
                visuals.faint_bg_color
            } else {
                Color32::TRANSPARENT
            };

            for slot in self.paint_order() {
                let Some(column) = self.columns.get(slot.column) else {
                    continue;
                };
                let x = frame.slot_x(slot);
                let rect = Rect::from_min_size(pos2(x, top), vec2(slot.width, row_height));
                let clip = frame.clip_for(slot, frame.body_clip);
                let cell_painter = ui.painter().with_clip_rect(clip);
                if slot.pin.is_some() {
                    cell_painter.rect_filled(rect, 0.0, visuals.panel_fill);
                }
                cell_painter.rect_filled(rect, 0.0, fill);
                if slot.pin_boundary {
                    paint_pin_edge(&cell_painter, rect, slot, &visuals);
                }

                let mut child = ui.new_child(
                    UiBuilder::new()
                        .id_salt((row.id, slot.id))
                        .max_rect(rect.shrink2(vec2(CELL_PADDING, 0.0)))
                        .layout(cell_layout(slot.align)),
                );
                child.set_clip_rect(clip);
                match column.kind {
                    ColumnKind::Selection => {
                        let mut checked = row.selected;
                        if child.checkbox(&mut checked, "").changed() {
                            events.push(GridEvent::ToggleRow(row.id));
                        }
                    }
                    ColumnKind::Data => cells.cell(&mut child, column, row),
                }
            }

            if self.options.row_border {
                painter.hline(
                    row_rect.x_range(),
                    row_rect.bottom(),
                    visuals.widgets.noninteractive.bg_stroke,
                );
            }

            if row.expanded {
                let rect = Rect::from_x_y_ranges(
                    frame.view.x_range(),
                    row_rect.bottom()..=row_rect.bottom() + EXPANDED_HEIGHT,
                );
                painter.rect_filled(rect, 0.0, visuals.extreme_bg_color);
                let mut child = ui.new_child(
                    UiBuilder::new()
                        .id_salt((row.id, "expanded"))
                        .max_rect(rect.shrink(CELL_PADDING))
                        .layout(Layout::left_to_right(Align::Center)),
                );
                child.set_clip_rect(rect.intersect(frame.body_clip));
                cells.expanded(&mut child, row);
            }
        }
    }

    fn paint_skeleton(&self, ui: &Ui, frame: &GridFrame, rows: usize, row_height: f32) {
        let body_top = frame.origin.y + frame.header_height;
        let fill = COLOR_SKELETON.gamma_multiply(0.25);
        for index in 0..rows {
            let top = body_top + index as f32 * row_height;
            if top + row_height < frame.body_clip.top() || top > frame.body_clip.bottom() {
                continue;
            }
            for slot in self.paint_order() {
                let x = frame.slot_x(slot);
                let painter = ui.painter().with_clip_rect(frame.clip_for(slot, frame.body_clip));
                let cell = Rect::from_min_size(pos2(x, top), vec2(slot.width, row_height));
                if slot.pin.is_some() {
                    painter.rect_filled(cell, 0.0, ui.visuals().panel_fill);
                }
                let bar = Rect::from_center_size(
                    cell.center(),
                    vec2((slot.width - 2.0 * CELL_PADDING).max(0.0) * 0.7, row_height * 0.4),
                );
                painter.rect_filled(bar, 4.0, fill);
            }
        }
    }

    fn paint_header(
        &self,
        ui: &mut Ui,
        frame: &GridFrame,
        cells: &mut dyn GridCells,
        events: &mut Vec<GridEvent>,
    ) {
        let visuals = ui.visuals().clone();
        let top = frame.header_top;
        let band = Rect::from_x_y_ranges(frame.view.x_range(), top..=top + frame.header_height);
        ui.painter()
            .with_clip_rect(frame.view)
            .rect_filled(band, 0.0, visuals.panel_fill);

        for slot in self.paint_order() {
            let Some(column) = self.columns.get(slot.column) else {
                continue;
            };
            let x = frame.slot_x(slot);
            let rect = Rect::from_min_size(pos2(x, top), vec2(slot.width, HEADER_HEIGHT));
            let clip = frame.clip_for(slot, frame.view);
            let painter = ui.painter().with_clip_rect(clip);
            painter.rect_filled(
                Rect::from_min_size(rect.min, vec2(slot.width, frame.header_height)),
                0.0,
                visuals.faint_bg_color,
            );
            if slot.pin_boundary {
                paint_pin_edge(&painter, rect, slot, &visuals);
            }

            match column.kind {
                ColumnKind::Selection => {
                    let mut child = ui.new_child(
                        UiBuilder::new()
                            .id_salt(("header", slot.id))
                            .max_rect(rect.shrink2(vec2(CELL_PADDING, 0.0)))
                            .layout(cell_layout(ColumnAlign::Center)),
                    );
                    child.set_clip_rect(clip);
                    self.select_all(&mut child, events);
                }
                ColumnKind::Data => {
                    self.header_cell(ui, column, slot, rect, clip, events);
                }
            }

            if self.table.show_filters && column.can_filter() {
                let filter_rect = Rect::from_min_size(
                    pos2(x, top + HEADER_HEIGHT),
                    vec2(slot.width, FILTER_ROW_HEIGHT),
                );
                let mut child = ui.new_child(
                    UiBuilder::new()
                        .id_salt(("filter", slot.id))
                        .max_rect(filter_rect.shrink2(vec2(4.0, 6.0)))
                        .layout(Layout::left_to_right(Align::Center)),
                );
                child.set_clip_rect(clip);
                cells.filter(&mut child, column);
            }
        }

        ui.painter().with_clip_rect(frame.view).hline(
            band.x_range(),
            band.bottom(),
            visuals.widgets.noninteractive.bg_stroke,
        );
    }

    fn select_all(&self, ui: &mut Ui, events: &mut Vec<GridEvent>) {
        let mut checked = self.page_check == CheckState::Checked;
        let response = ui.add(
            egui::Checkbox::new(&mut checked, "")
                .indeterminate(self.page_check == CheckState::Indeterminate),
        );
        response.widget_info(|| {
            WidgetInfo::selected(WidgetType::Checkbox, true, checked, "Select all")
        });
        if response.clicked() {
            events.push(GridEvent::TogglePage);
        }
    }

    fn header_cell(
        &self,
        ui: &mut Ui,
        column: &ColumnDef,
        slot: &ColumnSlot,
        rect: Rect,
        clip: Rect,
        events: &mut Vec<GridEvent>,
    ) {
        let visuals = ui.visuals().clone();
        let painter = ui.painter().with_clip_rect(clip);

        let mut title = column.title.clone();
        let mut title_color = visuals.strong_text_color();
        if let Some(direction) = self.table.sorting.direction(&column.id) {
            title.push_str(match direction {
                SortDirection::Asc => " ⬆",
                SortDirection::Desc => " ⬇",
            });
            if self.table.sorting.keys().len() > 1
                && let Some(index) = self.table.sorting.index(&column.id)
            {
                title.push_str(&format!("{}", index + 1));
            }
            title_color = COLOR_BLUE;
        }
        let inner = rect.shrink2(vec2(CELL_PADDING, 0.0));
        let (anchor, pos) = match column.header_align {
            ColumnAlign::Left => (egui::Align2::LEFT_CENTER, inner.left_center()),
            ColumnAlign::Center => (egui::Align2::CENTER_CENTER, inner.center()),
            ColumnAlign::Right => (egui::Align2::RIGHT_CENTER, inner.right_center()),
        };
        painter.text(pos, anchor, title, FontId::proportional(14.0), title_color);

        if column.can_sort() {
            let response = ui
                .interact(rect.intersect(clip), ui.id().with(("sort", slot.id)), Sense::click())
                .on_hover_cursor(CursorIcon::PointingHand);
            if response.clicked() {
                events.push(GridEvent::Sort {
                    column: column.id,
                    multi: ui.input(|i| i.modifiers.shift),
                });
            }
        }

        if self.options.resizable_columns && slot.resizable {
            let handle = Rect::from_x_y_ranges(
                (rect.right() - RESIZE_GRAB)..=(rect.right() + RESIZE_GRAB),
                rect.y_range(),
            );
            let response = ui.interact(
                handle.intersect(clip),
                ui.id().with(("resize", slot.id)),
                Sense::click_and_drag(),
            );
            if response.hovered() || response.dragged() {
                ui.ctx().set_cursor_icon(CursorIcon::ResizeColumn);
                painter.vline(
                    rect.right() - 1.0,
                    rect.y_range(),
                    Stroke::new(2.0, visuals.selection.bg_fill),
                );
            }
            if response.double_clicked() {
                events.push(GridEvent::ResetWidth(column.id));
            } else if response.dragged() {
                let delta = response.drag_delta().x;
                if delta != 0.0 {
                    events.push(GridEvent::Resize {
                        column: column.id,
                        delta,
                    });
                }
            }
        }
    }
}

fn cell_layout(align: ColumnAlign) -> Layout {
    match align {
        ColumnAlign::Left => Layout::left_to_right(Align::Center),
        ColumnAlign::Center => Layout::centered_and_justified(egui::Direction::LeftToRight),
        ColumnAlign::Right => Layout::right_to_left(Align::Center),
    }
}

/// Shadow line on the edge where scrolling columns slide under the pins.
fn paint_pin_edge(painter: &egui::Painter, rect: Rect, slot: &ColumnSlot, visuals: &egui::Visuals) {
    let x = match slot.pin {
        Some(PinSide::Left) => rect.right(),
        Some(PinSide::Right) => rect.left(),
        None => return,
    };
    painter.vline(
        x,
        rect.y_range(),
        Stroke::new(2.0, visuals.widgets.noninteractive.bg_stroke.color),
    );
}
