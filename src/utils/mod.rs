//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application:
//! size parsing/measurement and best-effort git metadata reading.

pub mod gitlog;
pub mod size;

pub use gitlog::read_last_commit;
pub use size::{dir_size_capped, parse_size};
