//! Shared color constants for the UI.

use egui::Color32;

/// Status badge for active users.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Status badge for disabled users and form errors.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Sort indicators and the selected-row accent.
pub const COLOR_BLUE: Color32 = Color32::from_rgb(59, 130, 246);

/// Skeleton placeholder bars.
pub const COLOR_SKELETON: Color32 = Color32::from_gray(128);

/// Role badge colors.
pub fn role_color(role: datagrid_business::users::Role) -> Color32 {
    use datagrid_business::users::Role;

    match role {
        Role::Staff => Color32::from_rgb(99, 102, 241),
        Role::Leader => Color32::from_rgb(234, 88, 12),
        Role::Manager => Color32::from_rgb(13, 148, 136),
        Role::Intern => Color32::from_rgb(161, 98, 7),
    }
}
