// src/models/pagination.rs
// DOCUMENTATION: Query parameters and envelope for list endpoints
// PURPOSE: Shared by colleges, programs and students

use serde::{Deserialize, Serialize};

/// Common list parameters
/// DOCUMENTATION: Pagination applies only when both `page` and `limit` are present
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Clamped (page, limit) when the caller asked for a window
    pub fn window(&self) -> Option<(i64, i64)> {
        match (self.page, self.limit) {
            (Some(page), Some(limit)) => Some((page.max(1), limit.max(1))),
            _ => None,
        }
    }
}

/// Student filter parameters (comma-separated value lists)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilterQuery {
    pub program: Option<String>,
    pub year: Option<String>,
    pub gender: Option<String>,
}

/// Program filter parameters (comma-separated value lists)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramFilterQuery {
    pub college: Option<String>,
}

/// Paginated response body
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub limit: i64,
    /// Rows matching the filters, ignoring the window
    pub total: i64,
}

/// Either the whole table or one window of it
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    All(Vec<T>),
    Paged(Page<T>),
}

/// Split "a, b,,c" into ["a", "b", "c"]
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
