//! Grid semantics and the user management page, independent of rendering.

pub mod config;
pub mod grid;
pub mod users;

pub use config::{ConfigError, DemoConfig, GridConfig};
pub use users::{FormError, FormField};
