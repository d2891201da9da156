// src/models/program.rs
// DOCUMENTATION: Program records and request payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row of program_table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Program {
    pub id: i32,
    pub program_code: String,
    pub program_name: String,
    /// References college_table.college_code
    pub college_code: String,
}

/// Body of POST /programs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProgramRequest {
    pub program_code: Option<String>,
    pub program_name: Option<String>,
    pub college_code: Option<String>,
}

/// Body of PUT /programs/{code}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProgramRequest {
    pub program_code: Option<String>,
    pub program_name: Option<String>,
    pub college_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProgramFields {
    #[validate(length(min = 1, max = 20))]
    pub program_code: String,
    #[validate(length(min = 1, max = 255))]
    pub program_name: String,
    #[validate(length(min = 1, max = 20))]
    pub college_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_longer_than_column_is_rejected() {
        let fields = ProgramFields {
            program_code: "BSCS".into(),
            program_name: "N".repeat(256),
            college_code: "CCS".into(),
        };
        let errors = fields.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("program_name"));
        assert!(!errors.field_errors().contains_key("program_code"));
    }
}
