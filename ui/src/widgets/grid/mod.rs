mod calendar;
mod filter;
mod table;

pub use calendar::calendar;
pub use filter::{FilterAction, FilterBuffers, filter_control};
pub use table::{
    EXPANDED_HEIGHT, FILTER_ROW_HEIGHT, GridCells, GridEvent, GridView, HEADER_HEIGHT,
};
