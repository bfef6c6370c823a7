//! Project data model.
//!
//! This module contains the core data structures for representing discovered
//! projects and the persisted index that aggregates them.
//!
//! ## Main Parts
//!
//! - [`Project`] - One discovered project with its inferred metadata
//! - [`ProjectType`] - Closed enumeration of recognised project types
//! - [`ProjectStatus`] - Activity status derived from commit recency
//! - [`ProjectIndex`] - The persisted aggregate of one full scan

pub mod index;
#[allow(clippy::module_inception)]
// This is acceptable as it is the main module for the project data model
pub mod project;

pub use index::{ProjectIndex, STALE_AFTER};
pub use project::{Project, ProjectStatus, ProjectType};
