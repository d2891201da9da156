// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod college_repository;
pub mod pagination;
pub mod program_repository;
pub mod student_repository;
pub mod user_repository;

pub use college_repository::*;
pub use pagination::*;
pub use program_repository::*;
pub use student_repository::*;
pub use user_repository::*;
