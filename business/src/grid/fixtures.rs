use chrono::NaiveDate;

use super::{CellValue, ColumnDef, FilterVariant, GridRecord, RowId};

#[derive(Debug, Clone)]
pub struct Person {
    pub id: RowId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub salary: f64,
    pub joined: NaiveDate,
    pub active: bool,
}

impl Person {
    pub fn new(id: &str, name: &str, role: &str, salary: f64) -> Self {
        Self {
            id: RowId::from(id),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: role.to_owned(),
            salary,
            joined: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            active: true,
        }
    }
}

impl GridRecord for Person {
    fn row_id(&self) -> RowId {
        self.id
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "name" => CellValue::from(self.name.as_str()),
            "email" => CellValue::from(self.email.as_str()),
            "role" => CellValue::from(self.role.as_str()),
            "salary" => CellValue::Number(self.salary),
            "joined" => CellValue::Date(self.joined),
            "active" => CellValue::Bool(self.active),
            _ => CellValue::Empty,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {} {}", self.id, self.name, self.email, self.role)
    }
}

pub fn person_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::selection(),
        ColumnDef::builder()
            .id("name")
            .title("Name")
            .extra_text_targets(vec!["email".into()])
            .build(),
        ColumnDef::builder()
            .id("role")
            .title("Role")
            .filter(FilterVariant::Multiple)
            .build(),
        ColumnDef::builder()
            .id("salary")
            .title("Salary")
            .filter(FilterVariant::Range)
            .width(120.0)
            .build(),
        ColumnDef::builder()
            .id("joined")
            .title("Joined")
            .filter(FilterVariant::Date)
            .build(),
        ColumnDef::builder()
            .id("active")
            .title("Active")
            .filter(FilterVariant::Select)
            .width(90.0)
            .build(),
    ]
}
