//! Core project data structures and types.
//!
//! This module defines the fundamental data structures used to represent
//! discovered development projects throughout the application.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enumeration of recognised project types.
///
/// Each variant corresponds to one rule of the detection cascade applied by
/// the classifier. The cascade is priority-ordered and the first matching
/// rule wins, so a directory holding both a `go.mod` and a `package.json`
/// is classified as [`ProjectType::Go`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Go project detected by a `go.mod` module file
    Go,

    /// Node.js project detected by a `package.json` manifest
    Nodejs,

    /// Vue project: a `package.json` manifest with a Vue marker
    /// (`vue.config.js`, `src/App.vue`, or a `vue` dependency)
    Vue,

    /// Python project detected by `requirements.txt`, `pyproject.toml`,
    /// or `setup.py`
    Python,

    /// Directory containing only a README with no other indicator
    Documentation,

    /// Indicator files present but none of the typed rules matched
    /// (e.g. only a `Dockerfile` or a `.git` directory)
    Unknown,
}

impl ProjectType {
    /// Stable lowercase name used in persisted documents and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Nodejs => "nodejs",
            Self::Vue => "vue",
            Self::Python => "python",
            Self::Documentation => "documentation",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ProjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

/// Activity status derived from the project's last commit recency.
///
/// - last commit within 30 days → [`ProjectStatus::Active`]
/// - within 180 days → [`ProjectStatus::Maintenance`]
/// - older → [`ProjectStatus::Archived`]
/// - no commit information → [`ProjectStatus::Unknown`]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Last commit within the last 30 days
    Active,

    /// Last commit within the last 180 days
    Maintenance,

    /// Last commit older than 180 days
    Archived,

    /// No usable commit information
    Unknown,
}

impl ProjectStatus {
    /// Derive a status from an optional last-commit timestamp.
    #[must_use]
    pub fn from_last_commit(last_commit: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(commit) = last_commit else {
            return Self::Unknown;
        };

        let age_days = (now - commit).num_days();
        if age_days <= 30 {
            Self::Active
        } else if age_days <= 180 {
            Self::Maintenance
        } else {
            Self::Archived
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Archived => "archived",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One discovered project.
///
/// Produced by the classifier when one or more indicator files are found
/// directly under a directory. Once a directory is classified as a project
/// its subdirectories are never classified independently, so project paths
/// are unique and never nested within each other.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Base name of the project directory
    pub name: String,

    /// Absolute path to the project root; unique key within an index
    pub path: PathBuf,

    /// Project type from the detection cascade
    #[serde(rename = "type")]
    pub kind: ProjectType,

    /// Ordered technology tags, e.g. `["nodejs", "vue"]`
    pub tech_stack: Vec<String>,

    /// Short descriptive sentence extracted from the README, if any.
    /// At most 200 characters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purpose: String,

    /// The indicator files that triggered classification (provenance)
    pub key_files: Vec<String>,

    /// Activity status derived from last-commit recency
    pub status: ProjectStatus,

    /// Timestamp of the most recent commit, when git metadata was readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<DateTime<Utc>>,

    /// Short aliases usable in queries; never empty after classification
    pub shortcuts: Vec<String>,

    /// Open key-value bag, reserved for future annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Display for Project {
    /// Format the project as `name [type, status] (path)`.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} [{}, {}] ({})",
            self.name,
            self.kind,
            self.status,
            self.path.display()
        )
    }
}
