//! Core module - shared types and utilities
//!
//! Provides:
//! - The `Table` result container
//! - Hashing and filesystem helpers

pub mod table;
pub mod util;
