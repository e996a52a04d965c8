#![warn(clippy::all, rust_2018_idioms)]

//! egui front end of the data grid demo: the user management page.

pub mod app;
pub mod pages;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::DataGridApp;
