// src/models/student.rs
// DOCUMENTATION: Student records and form payloads
// PURPOSE: Maps student_table rows; create/update arrive as multipart forms

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Accepted values for the gender column
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// A row of student_table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i32,
    /// External-facing key, e.g. 2024-0001
    pub student_id: String,
    pub firstname: String,
    pub lastname: String,
    /// References program_table.program_code
    pub program_code: String,
    pub year: i32,
    pub gender: String,
    pub avatar_url: Option<String>,
}

/// Text fields of a student form, exactly as submitted
/// DOCUMENTATION: `year` stays a string until the service parses it so that
/// "missing" and "not a number" produce different messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub student_id: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub program_code: Option<String>,
    pub year: Option<String>,
    pub gender: Option<String>,
}

impl StudentForm {
    /// Field names in the order presence is checked on create
    pub const REQUIRED: [&'static str; 6] = [
        "student_id",
        "firstname",
        "lastname",
        "program_code",
        "year",
        "gender",
    ];

    /// Record one text part; unknown names are ignored
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "student_id" => &mut self.student_id,
            "firstname" => &mut self.firstname,
            "lastname" => &mut self.lastname,
            "program_code" => &mut self.program_code,
            "year" => &mut self.year,
            "gender" => &mut self.gender,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "student_id" => self.student_id.as_deref(),
            "firstname" => self.firstname.as_deref(),
            "lastname" => self.lastname.as_deref(),
            "program_code" => self.program_code.as_deref(),
            "year" => self.year.as_deref(),
            "gender" => self.gender.as_deref(),
            _ => None,
        }
    }
}

/// Fully-resolved column values for an insert or update
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct StudentFields {
    #[validate(length(min = 1, max = 20))]
    pub student_id: String,
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    #[validate(length(min = 1, max = 20))]
    pub program_code: String,
    #[validate(range(min = 1, max = 4))]
    pub year: i32,
    #[validate(custom = "validate_gender")]
    pub gender: String,
    pub avatar_url: Option<String>,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(ValidationError::new("gender"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> StudentFields {
        StudentFields {
            student_id: "2024-0001".into(),
            firstname: "Mary".into(),
            lastname: "Smith".into(),
            program_code: "BSCS".into(),
            year: 2,
            gender: "Female".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn test_form_set_and_get() {
        let mut form = StudentForm::default();
        form.set("firstname", "Mary".into());
        form.set("avatar", "ignored".into());

        assert_eq!(form.get("firstname"), Some("Mary"));
        assert_eq!(form.get("lastname"), None);
        assert_eq!(form.get("avatar"), None);
    }

    #[test]
    fn test_valid_fields() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn test_year_out_of_range() {
        let mut f = fields();
        f.year = 5;
        assert!(f.validate().is_err());
        f.year = 0;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_unknown_gender() {
        let mut f = fields();
        f.gender = "female".into();
        assert!(f.validate().is_err());
    }
}
