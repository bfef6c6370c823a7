//! # projdex
//!
//! Library crate for discovering development projects on disk, persisting
//! them as a searchable index, and resolving free-text queries back to
//! project paths.
//!
//! The pipeline has three stages:
//!
//! 1. **Classify** ([`classifier`]) - walk a directory tree, detect project
//!    roots via indicator files, and infer type, purpose, activity status,
//!    and shortcut aliases for each one.
//! 2. **Persist** ([`store`]) - assemble the discovered projects into a
//!    [`project::ProjectIndex`], validate it, and keep it fresh on disk with
//!    a 24-hour staleness window and atomic whole-file replacement.
//! 3. **Resolve** ([`resolver`]) - tokenize a natural-language query and
//!    score it against project names and shortcuts with a tiered similarity
//!    metric (exact, containment, edit distance).

pub mod cancel;
pub mod classifier;
pub mod config;
pub mod output;
pub mod project;
pub mod resolver;
pub mod store;
pub mod utils;

pub use cancel::CancelToken;
pub use config::{FileConfig, ScanConfig};
pub use project::{Project, ProjectIndex, ProjectStatus, ProjectType};
pub use resolver::{ResolveOptions, ResolvedProject};
pub use store::{IndexError, IndexStore, ScanReport};
