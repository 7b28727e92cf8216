//! Form-level validation for creating and editing a student.
//!
//! Stricter than the server: it also checks the email shape and keeps age
//! within 1..=120. Field rules are declared with `validator`.

use std::collections::BTreeMap;

use student_records_core::{NewStudent, Student};
use validator::{Validate, ValidationErrors};

/// Per-field error messages keyed by field name.
pub type FormErrors = BTreeMap<String, String>;

/// Raw form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub age: String,
    pub address: String,
}

/// Trimmed form values with the age already parsed.
#[derive(Debug, Validate)]
struct CheckedForm {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email format is invalid")
    )]
    email: String,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    age: Option<i32>,
    #[validate(length(min = 1, message = "Address is required"))]
    address: String,
}

impl StudentForm {
    /// Pre-filled form for editing an existing record.
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone().unwrap_or_default(),
            email: student.email.clone().unwrap_or_default(),
            age: student.age.map(|a| a.to_string()).unwrap_or_default(),
            address: student.address.clone().unwrap_or_default(),
        }
    }

    /// Validates every field and returns the trimmed input on success.
    pub fn validate(&self) -> Result<NewStudent, FormErrors> {
        let mut errors = FormErrors::new();
        let raw_age = self.age.trim();
        let age = if raw_age.is_empty() {
            errors.insert("age".to_owned(), "Age is required".to_owned());
            None
        } else if let Ok(age) = raw_age.parse::<i32>() {
            Some(age)
        } else {
            errors.insert("age".to_owned(), "Age must be a whole number".to_owned());
            None
        };

        let form = CheckedForm {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            age,
            address: self.address.trim().to_owned(),
        };
        if let Err(e) = form.validate() {
            collect_errors(&e, &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewStudent {
            name: Some(form.name),
            email: Some(form.email),
            age: form.age,
            address: Some(form.address),
        })
    }
}

/// First message per field; a field with no message falls back to its error code.
fn collect_errors(e: &ValidationErrors, errors: &mut FormErrors) {
    for (field, field_errors) in e.field_errors() {
        if let Some(first) = field_errors.first() {
            let message =
                first.message.as_ref().map_or_else(|| first.code.to_string(), ToString::to_string);
            errors.entry(field.to_string()).or_insert(message);
        }
    }
}
