use crate::grid::{Align, ColumnDef, FilterVariant};

use super::Role;

/// Columns of the user management grid.
pub fn user_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::selection(),
        ColumnDef::builder()
            .id("username")
            .title("Username")
            .extra_text_targets(vec!["email".into()])
            .width(260.0)
            .min_width(160.0)
            .hideable(false)
            .build(),
        ColumnDef::builder()
            .id("role")
            .title("Role")
            .filter(FilterVariant::Combobox)
            .options(Role::ALL.iter().map(|role| role.as_str().to_owned()).collect())
            .width(140.0)
            .build(),
        ColumnDef::builder()
            .id("national")
            .title("Nationality")
            .filter(FilterVariant::Multiple)
            .width(170.0)
            .build(),
        ColumnDef::builder()
            .id("salary")
            .title("Salary")
            .filter(FilterVariant::Range)
            .header_align(Align::Right)
            .width(140.0)
            .build(),
        ColumnDef::builder()
            .id("join_date")
            .title("Join Date")
            .filter(FilterVariant::Date)
            .width(190.0)
            .build(),
        ColumnDef::builder()
            .id("active")
            .title("Status")
            .filter(FilterVariant::Select)
            .header_align(Align::Center)
            .width(130.0)
            .build(),
    ]
}
