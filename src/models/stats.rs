// src/models/stats.rs

use serde::Serialize;

/// Dashboard totals for GET /stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_colleges: i64,
    pub total_programs: i64,
}
