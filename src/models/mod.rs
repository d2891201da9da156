// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod college;
pub mod pagination;
pub mod program;
pub mod stats;
pub mod student;
pub mod user;

pub use college::*;
pub use pagination::*;
pub use program::*;
pub use stats::*;
pub use student::*;
pub use user::*;
