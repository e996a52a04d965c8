mod action_bar;
mod column_menu;
mod edit_dialog;
mod grid;
mod pagination;
mod popup;
mod selected_ids;

pub use action_bar::action_bar;
pub use column_menu::{ColumnMenuEvent, column_menu};
pub use edit_dialog::{EditDialogEvent, edit_dialog};
pub use grid::{
    EXPANDED_HEIGHT, FILTER_ROW_HEIGHT, FilterAction, FilterBuffers, GridCells, GridEvent,
    GridView, HEADER_HEIGHT, calendar, filter_control,
};
pub use pagination::{PaginationEvent, pagination};
pub use popup::{popup_below, popup_button};
pub use selected_ids::selected_ids_window;
