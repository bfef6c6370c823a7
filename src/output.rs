//! Structured JSON output for scripting and piping.
//!
//! This module provides serializable data structures that represent the
//! output of the `scan`, `resolve`, and `status` commands. When the `--json`
//! flag is passed, these structures are serialized to stdout as a single
//! JSON object, replacing all human-readable output.

use chrono::{DateTime, Utc};
use humansize::{DECIMAL, format_size};
use serde::Serialize;

use crate::{
    project::{Project, ProjectIndex, ProjectStatus, ProjectType},
    resolver::ResolvedProject,
};

/// One project entry in `scan`/`status` JSON output.
#[derive(Serialize)]
pub struct JsonProjectEntry {
    /// Project name (directory base name).
    pub name: String,

    /// Project type (`"go"`, `"nodejs"`, `"vue"`, `"python"`,
    /// `"documentation"`, `"unknown"`).
    #[serde(rename = "type")]
    pub project_type: ProjectType,

    /// Absolute path to the project root directory.
    pub path: String,

    /// Activity status derived from commit recency.
    pub status: ProjectStatus,

    /// Purpose line from the README, omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub purpose: String,

    /// Shortcut aliases for this project.
    pub shortcuts: Vec<String>,
}

impl From<&Project> for JsonProjectEntry {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            project_type: project.kind,
            path: project.path.display().to_string(),
            status: project.status,
            purpose: project.purpose.clone(),
            shortcuts: project.shortcuts.clone(),
        }
    }
}

/// Output of a `scan` command.
#[derive(Serialize)]
pub struct ScanJsonOutput {
    /// Root directory the scan covered.
    pub scan_path: String,

    /// When the index was assembled.
    pub updated_at: DateTime<Utc>,

    /// Number of projects discovered.
    pub total_projects: usize,

    /// The discovered projects.
    pub projects: Vec<JsonProjectEntry>,

    /// Non-fatal warnings collected during the scan.
    pub warnings: Vec<String>,
}

impl ScanJsonOutput {
    /// Build the scan document from a freshly assembled index.
    #[must_use]
    pub fn from_index(index: &ProjectIndex, warnings: &[String]) -> Self {
        Self {
            scan_path: index.scan_path.display().to_string(),
            updated_at: index.updated_at,
            total_projects: index.total_count,
            projects: index.projects.iter().map(JsonProjectEntry::from).collect(),
            warnings: warnings.to_vec(),
        }
    }
}

/// Output of a `resolve` command.
#[derive(Serialize)]
pub struct ResolveJsonOutput {
    /// Whether any project cleared the threshold.
    pub matched: bool,

    /// Name of the winning project, absent on no-match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Path of the winning project, absent on no-match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Winning similarity score, absent on no-match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ResolveJsonOutput {
    /// Build the resolve document from an optional match.
    #[must_use]
    pub fn from_result(result: Option<&ResolvedProject>) -> Self {
        Self {
            matched: result.is_some(),
            name: result.map(|r| r.name.clone()),
            path: result.map(|r| r.path.display().to_string()),
            score: result.map(|r| r.score),
        }
    }
}

/// Output of a `status` command.
#[derive(Serialize)]
pub struct StatusJsonOutput {
    /// Where the index document lives.
    pub index_file: String,

    /// Index file size in bytes.
    pub index_size: u64,

    /// Human-readable formatted index size (e.g. `"12.3 kB"`).
    pub index_size_formatted: String,

    /// When the index was last rebuilt.
    pub updated_at: DateTime<Utc>,

    /// Whether the index is past the 24h freshness window.
    pub stale: bool,

    /// Number of indexed projects.
    pub total_projects: usize,

    /// Number of shortcut aliases in the merged map.
    pub total_shortcuts: usize,
}

impl StatusJsonOutput {
    /// Build the status document from a loaded index and its on-disk size.
    #[must_use]
    pub fn from_index(index: &ProjectIndex, index_file: &std::path::Path, size: u64) -> Self {
        Self {
            index_file: index_file.display().to_string(),
            index_size: size,
            index_size_formatted: format_size(size, DECIMAL),
            updated_at: index.updated_at,
            stale: index.is_stale(Utc::now()),
            total_projects: index.total_count,
            total_shortcuts: index.shortcuts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::BTreeMap, path::Path, path::PathBuf};

    fn sample_index() -> ProjectIndex {
        let project = Project {
            name: "taqwa".to_string(),
            path: PathBuf::from("/dev/taqwa"),
            kind: ProjectType::Go,
            tech_stack: vec!["go".to_string()],
            purpose: String::new(),
            key_files: vec!["go.mod".to_string()],
            status: ProjectStatus::Active,
            last_commit: None,
            shortcuts: vec!["taqw".to_string()],
            metadata: BTreeMap::new(),
        };
        ProjectIndex::assemble(vec![project], Path::new("/dev"), &BTreeMap::new())
    }

    #[test]
    fn test_scan_output_shape() {
        let index = sample_index();
        let output = ScanJsonOutput::from_index(&index, &["warn".to_string()]);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["scan_path"], "/dev");
        assert_eq!(json["total_projects"], 1);
        assert_eq!(json["projects"][0]["name"], "taqwa");
        assert_eq!(json["projects"][0]["type"], "go");
        // Empty purpose is omitted per-entry
        assert!(json["projects"][0].get("purpose").is_none());
        assert_eq!(json["warnings"][0], "warn");
    }

    #[test]
    fn test_resolve_output_no_match() {
        let output = ResolveJsonOutput::from_result(None);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["matched"], false);
        assert!(json.get("path").is_none());
    }

    #[test]
    fn test_resolve_output_match() {
        let hit = ResolvedProject {
            name: "taqwa".to_string(),
            path: PathBuf::from("/dev/taqwa"),
            score: 1.0,
        };
        let json = serde_json::to_value(ResolveJsonOutput::from_result(Some(&hit))).unwrap();

        assert_eq!(json["matched"], true);
        assert_eq!(json["name"], "taqwa");
        assert_eq!(json["path"], "/dev/taqwa");
    }

    #[test]
    fn test_status_output_staleness() {
        let mut index = sample_index();
        index.updated_at = Utc::now() - chrono::Duration::hours(30);

        let output = StatusJsonOutput::from_index(&index, Path::new("/tmp/index.json"), 1234);
        assert!(output.stale);
        assert_eq!(output.total_projects, 1);
        assert_eq!(output.index_size, 1234);
        assert!(!output.index_size_formatted.is_empty());
    }
}
