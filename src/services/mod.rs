// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod college_service;
pub mod fields;
pub mod image_store;
pub mod program_service;
pub mod stats_service;
pub mod student_service;

pub use auth_service::*;
pub use college_service::*;
pub use image_store::*;
pub use program_service::*;
pub use stats_service::*;
pub use student_service::*;
