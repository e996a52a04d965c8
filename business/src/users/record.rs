use std::fmt;

use chrono::{DateTime, Utc};

use crate::grid::{CellValue, GridRecord, RowId, format_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Staff,
    Leader,
    Manager,
    Intern,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Staff, Self::Leader, Self::Manager, Self::Intern];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "STAFF",
            Self::Leader => "LEADER",
            Self::Manager => "MANAGER",
            Self::Intern => "INTERN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Nationality {
    Vietnamese,
    Korean,
    UnitedStates,
}

impl Nationality {
    pub const ALL: [Self; 3] = [Self::Vietnamese, Self::Korean, Self::UnitedStates];

    pub fn label(self) -> &'static str {
        match self {
            Self::Vietnamese => "Vietnamese",
            Self::Korean => "Korean",
            Self::UnitedStates => "United States",
        }
    }

    /// ISO 3166 alpha-2 code shown next to the label.
    pub fn code(self) -> &'static str {
        match self {
            Self::Vietnamese => "VN",
            Self::Korean => "KR",
            Self::UnitedStates => "US",
        }
    }
}

pub const ACTIVE_LABEL: &str = "Active";
pub const DISABLED_LABEL: &str = "Disabled";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: RowId,
    pub username: String,
    pub avatar: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub join_date: DateTime<Utc>,
    pub salary: u32,
    pub national: Nationality,
}

impl User {
    pub fn status_label(&self) -> &'static str {
        if self.active { ACTIVE_LABEL } else { DISABLED_LABEL }
    }

    pub fn initials(&self) -> String {
        self.username
            .split(|c: char| !c.is_alphanumeric())
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl GridRecord for User {
    fn row_id(&self) -> RowId {
        self.id
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "id" => CellValue::from(self.id.as_str()),
            "username" => CellValue::from(self.username.as_str()),
            "email" => CellValue::from(self.email.as_str()),
            "role" => CellValue::from(self.role.as_str()),
            "national" => CellValue::from(self.national.label()),
            "salary" => CellValue::from(self.salary),
            "join_date" => CellValue::day(&self.join_date),
            "active" => CellValue::from(self.status_label()),
            _ => CellValue::Empty,
        }
    }

    fn search_text(&self) -> String {
        let date = self.join_date.format("%Y/%m/%d").to_string();
        let salary = format_number(f64::from(self.salary));
        let parts: [&str; 9] = [
            self.id.as_str(),
            &self.username,
            &self.avatar,
            &self.email,
            self.role.as_str(),
            self.status_label(),
            &date,
            &salary,
            self.national.label(),
        ];
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(Role::parse("staff"), Some(Role::Staff));
        assert_eq!(Role::parse(" MANAGER "), Some(Role::Manager));
        assert_eq!(Role::parse("auto"), None);
    }

    #[test]
    fn initials_from_username_parts() {
        let user = User {
            id: RowId::from("u1"),
            username: "john.smith42".into(),
            avatar: String::new(),
            email: "a@b.com".into(),
            role: Role::Staff,
            active: true,
            join_date: DateTime::from_timestamp(1_765_000_000, 0).unwrap(),
            salary: 250,
            national: Nationality::Korean,
        };
        assert_eq!(user.initials(), "JS");
        assert!(user.search_text().contains("a@b.com"));
        assert_eq!(user.cell("salary"), CellValue::Number(250.0));
        assert_eq!(user.cell("active"), CellValue::from("Active"));
    }
}
