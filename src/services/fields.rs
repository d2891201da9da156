// src/services/fields.rs
// DOCUMENTATION: Input helpers shared by the entity services
// PURPOSE: Presence checks, partial-update merging, list request building

use crate::db::{PageRequest, SortDirection};
use crate::errors::ApiError;
use crate::models::ListQuery;
use validator::Validate;

/// Some(value) only when the value has non-whitespace content
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Partial-update rule: absent keeps `current`, blank is rejected
pub fn merge(provided: Option<String>, current: &str, name: &str) -> Result<String, ApiError> {
    match provided {
        None => Ok(current.to_string()),
        Some(v) if v.trim().is_empty() => {
            Err(ApiError::Validation(format!("{} cannot be empty", name)))
        }
        Some(v) => Ok(v),
    }
}

/// Column-size and format checks, reported as a 400
pub fn check<T: Validate>(fields: &T) -> Result<(), ApiError> {
    fields
        .validate()
        .map_err(|e| ApiError::Validation(format!("Invalid input: {}", e)))
}

/// Build the repository request for a clamped window
pub fn page_request(
    page: i64,
    limit: i64,
    query: &ListQuery,
    filters: Vec<(&'static str, Vec<String>)>,
) -> PageRequest {
    let mut req = PageRequest::new(page, limit);
    req.sort_by = query.sort_by.clone();
    req.direction = SortDirection::parse(query.sort_order.as_deref());
    req.search = query.search.clone();
    req.filters = filters;
    req
}
