// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configs and shared extractor settings

pub mod auth;
pub mod colleges;
pub mod forms;
pub mod health;
pub mod programs;
pub mod stats;
pub mod students;
pub mod users;

pub use auth::config as auth_config;
pub use colleges::config as colleges_config;
pub use health::config as health_config;
pub use programs::config as programs_config;
pub use stats::config as stats_config;
pub use students::config as students_config;
pub use users::config as users_config;

use crate::errors::ApiError;
use actix_web::web;

/// Malformed JSON bodies become `400 {"error": ...}` like any other validation failure
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| ApiError::Validation(format!("Invalid JSON body: {}", err)).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query parameters: {}", err)).into()
    })
}
