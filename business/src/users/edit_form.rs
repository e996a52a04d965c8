use std::collections::BTreeMap;

use super::{Role, User};
use crate::grid::RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Username,
    Email,
    Role,
    Salary,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Username must be at least 3 characters.")]
    UsernameTooShort,
    #[error("Username must be at most 20 characters.")]
    UsernameTooLong,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Please select a role.")]
    RoleMissing,
    #[error("Auto-detection is not allowed. Please select a specific role.")]
    RoleAuto,
    #[error("Unknown role {0}.")]
    UnknownRole(String),
    #[error("Salary must be a number.")]
    SalaryNotANumber,
    #[error("Salary must be between 100 and 500.")]
    SalaryOutOfRange,
}

impl FormError {
    pub fn field(&self) -> FormField {
        match self {
            Self::UsernameTooShort | Self::UsernameTooLong => FormField::Username,
            Self::InvalidEmail => FormField::Email,
            Self::RoleMissing | Self::RoleAuto | Self::UnknownRole(_) => FormField::Role,
            Self::SalaryNotANumber | Self::SalaryOutOfRange => FormField::Salary,
        }
    }
}

/// Validated edit, ready to be written into the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPatch {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub salary: u32,
    pub active: bool,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        user.username.clone_from(&self.username);
        user.email.clone_from(&self.email);
        user.role = self.role;
        user.salary = self.salary;
        user.active = self.active;
    }
}

/// Text buffers of the update dialog plus the last validation errors.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEditForm {
    pub user_id: RowId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub salary: String,
    pub active: bool,
    errors: BTreeMap<FormField, FormError>,
    initial: UserPatch,
}

impl UserEditForm {
    pub fn from_user(user: &User) -> Self {
        let initial = UserPatch {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            salary: user.salary,
            active: user.active,
        };
        let mut form = Self {
            user_id: user.id,
            username: String::new(),
            email: String::new(),
            role: String::new(),
            salary: String::new(),
            active: false,
            errors: BTreeMap::new(),
            initial,
        };
        form.reset();
        form
    }

    /// Restores the values of the record the form was opened with.
    pub fn reset(&mut self) {
        self.username.clone_from(&self.initial.username);
        self.email.clone_from(&self.initial.email);
        self.role = self.initial.role.as_str().to_owned();
        self.salary = self.initial.salary.to_string();
        self.active = self.initial.active;
        self.errors.clear();
    }

    pub fn validate(&self) -> Result<UserPatch, Vec<FormError>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        match username.chars().count() {
            0..3 => errors.push(FormError::UsernameTooShort),
            21.. => errors.push(FormError::UsernameTooLong),
            _ => {}
        }

        let email = self.email.trim();
        if !is_email(email) {
            errors.push(FormError::InvalidEmail);
        }

        let role = self.role.trim();
        let parsed_role = if role.is_empty() {
            errors.push(FormError::RoleMissing);
            None
        } else if role.eq_ignore_ascii_case("auto") {
            errors.push(FormError::RoleAuto);
            None
        } else {
            let parsed = Role::parse(role);
            if parsed.is_none() {
                errors.push(FormError::UnknownRole(role.to_owned()));
            }
            parsed
        };

        let salary = match self.salary.trim().parse::<u32>() {
            Ok(salary) if (100..=500).contains(&salary) => Some(salary),
            Ok(_) => {
                errors.push(FormError::SalaryOutOfRange);
                None
            }
            Err(_) => {
                errors.push(FormError::SalaryNotANumber);
                None
            }
        };

        match (parsed_role, salary) {
            (Some(role), Some(salary)) if errors.is_empty() => Ok(UserPatch {
                username: username.to_owned(),
                email: email.to_owned(),
                role,
                salary,
                active: self.active,
            }),
            _ => Err(errors),
        }
    }

    /// Validates and records the errors per field.
    pub fn check(&mut self) -> Option<UserPatch> {
        match self.validate() {
            Ok(patch) => {
                self.errors.clear();
                Some(patch)
            }
            Err(errors) => {
                self.errors = errors.into_iter().map(|err| (err.field(), err)).collect();
                None
            }
        }
    }

    pub fn error(&self, field: FormField) -> Option<&FormError> {
        self.errors.get(&field)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// `local@domain.tld` with no whitespace and no empty labels.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::users::Nationality;

    fn user() -> User {
        User {
            id: RowId::from("u-1"),
            username: "mia_kim7".into(),
            avatar: String::new(),
            email: "mia.kim@example.com".into(),
            role: Role::Leader,
            active: false,
            join_date: DateTime::from_timestamp(1_765_000_000, 0).unwrap(),
            salary: 320,
            national: Nationality::Korean,
        }
    }

    #[test]
    fn untouched_form_is_valid() {
        let form = UserEditForm::from_user(&user());
        let patch = form.validate().expect("record values are valid");
        assert_eq!(patch.role, Role::Leader);
        assert_eq!(patch.salary, 320);
    }

    #[test]
    fn errors_are_reported_per_field() {
        let mut form = UserEditForm::from_user(&user());
        form.username = "mi".into();
        form.email = "mia@example".into();
        form.role = "auto".into();
        form.salary = "900".into();
        assert!(form.check().is_none());
        assert_eq!(form.error(FormField::Username), Some(&FormError::UsernameTooShort));
        assert_eq!(form.error(FormField::Email), Some(&FormError::InvalidEmail));
        assert_eq!(form.error(FormField::Role), Some(&FormError::RoleAuto));
        assert_eq!(form.error(FormField::Salary), Some(&FormError::SalaryOutOfRange));

        form.reset();
        assert!(!form.has_errors());
        assert!(form.check().is_some());
    }

    #[test]
    fn long_names_and_blank_roles() {
        let mut form = UserEditForm::from_user(&user());
        form.username = "a".repeat(21);
        form.role = " ".into();
        form.salary = "abc".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FormError::UsernameTooLong,
                FormError::RoleMissing,
                FormError::SalaryNotANumber
            ]
        );
    }

    #[test]
    fn patch_writes_back() {
        let mut record = user();
        let mut form = UserEditForm::from_user(&record);
        form.salary = "450".into();
        form.active = true;
        let patch = form.check().unwrap();
        patch.apply(&mut record);
        assert_eq!(record.salary, 450);
        assert!(record.active);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.com"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@b..com"));
    }
}
