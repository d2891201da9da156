// src/models/college.rs
// DOCUMENTATION: College records and request payloads
// PURPOSE: Maps college_table rows and the bodies of POST/PUT /colleges

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row of college_table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct College {
    pub id: i32,
    pub college_code: String,
    pub college_name: String,
}

/// Body of POST /colleges
/// Fields are optional so a missing field becomes a 400 with our own message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCollegeRequest {
    pub college_code: Option<String>,
    pub college_name: Option<String>,
}

/// Body of PUT /colleges/{code}; omitted fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollegeRequest {
    pub college_code: Option<String>,
    pub college_name: Option<String>,
}

/// Fully-resolved column values for an insert or update
/// Lengths mirror the VARCHAR sizes of college_table
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CollegeFields {
    #[validate(length(min = 1, max = 20))]
    pub college_code: String,
    #[validate(length(min = 1, max = 255))]
    pub college_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_longer_than_column_is_rejected() {
        let fields = CollegeFields {
            college_code: "C".repeat(21),
            college_name: "College of Computer Studies".into(),
        };
        let errors = fields.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("college_code"));

        let fields = CollegeFields {
            college_code: "C".repeat(20),
            ..fields
        };
        assert!(fields.validate().is_ok());
    }
}
