//! The persisted project index aggregate.
//!
//! A [`ProjectIndex`] is the unit of persistence: an ordered list of
//! [`Project`] records plus a merged shortcut map, a scan timestamp, and the
//! scan root. Indexes are always replaced wholesale, never patched in place,
//! so readers never observe a torn mix of old and new entries.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Project;

/// Freshness window after which a persisted index is considered stale.
pub const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Aggregate of all projects discovered by one scan.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIndex {
    /// Discovered projects, in scan (depth-first) order
    pub projects: Vec<Project>,

    /// When the scan that produced this index completed
    pub updated_at: DateTime<Utc>,

    /// Must equal `projects.len()`; checked by [`ProjectIndex::validate`]
    pub total_count: usize,

    /// Absolute root directory the scan started from
    pub scan_path: PathBuf,

    /// Merged alias map. Keys are shortcut strings, values are project
    /// names; every value must name a project present in `projects`.
    pub shortcuts: BTreeMap<String, String>,
}

impl ProjectIndex {
    /// Assemble an index from freshly scanned projects.
    ///
    /// The shortcut map is built from each project's own aliases, then
    /// overlaid with the configured overrides whose canonical name resolves
    /// to a discovered project. Overrides targeting unknown projects are
    /// dropped rather than breaking referential integrity.
    #[must_use]
    pub fn assemble(
        projects: Vec<Project>,
        scan_path: &Path,
        configured: &BTreeMap<String, String>,
    ) -> Self {
        let mut shortcuts = BTreeMap::new();

        for project in &projects {
            for alias in &project.shortcuts {
                shortcuts.insert(alias.clone(), project.name.clone());
            }
        }

        for (alias, canonical) in configured {
            if let Some(project) = projects
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(canonical))
            {
                shortcuts.insert(alias.to_lowercase(), project.name.clone());
            }
        }

        Self {
            total_count: projects.len(),
            projects,
            updated_at: Utc::now(),
            scan_path: scan_path.to_path_buf(),
            shortcuts,
        }
    }

    /// Check the structural invariants required before persisting.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first violation found:
    /// - `total_count` differs from the number of projects
    /// - a shortcut maps to a name not present in the project list
    /// - two projects share the same path
    pub fn validate(&self) -> Result<(), String> {
        if self.total_count != self.projects.len() {
            return Err(format!(
                "totalCount is {} but the index holds {} projects",
                self.total_count,
                self.projects.len()
            ));
        }

        for (alias, canonical) in &self.shortcuts {
            if !self.projects.iter().any(|p| &p.name == canonical) {
                return Err(format!(
                    "shortcut '{alias}' points at unknown project '{canonical}'"
                ));
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for project in &self.projects {
            if !seen.insert(&project.path) {
                return Err(format!(
                    "duplicate project path: {}",
                    project.path.display()
                ));
            }
        }

        Ok(())
    }

    /// Whether this index is older than the freshness window.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.updated_at);
        age.to_std().is_ok_and(|age| age > STALE_AFTER)
    }

    /// Look up a project by exact name.
    #[must_use]
    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectStatus, ProjectType};
    use chrono::Duration as ChronoDuration;

    fn project(name: &str, path: &str, shortcuts: &[&str]) -> Project {
        Project {
            name: name.to_string(),
            path: PathBuf::from(path),
            kind: ProjectType::Unknown,
            tech_stack: vec![],
            purpose: String::new(),
            key_files: vec![],
            status: ProjectStatus::Unknown,
            last_commit: None,
            shortcuts: shortcuts.iter().map(ToString::to_string).collect(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_assemble_merges_project_shortcuts() {
        let projects = vec![
            project("carlogbook", "/dev/carlogbook", &["carl"]),
            project("taqwa", "/dev/taqwa", &["taqw"]),
        ];
        let index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());

        assert_eq!(index.total_count, 2);
        assert_eq!(index.shortcuts.get("carl"), Some(&"carlogbook".to_string()));
        assert_eq!(index.shortcuts.get("taqw"), Some(&"taqwa".to_string()));
    }

    #[test]
    fn test_assemble_applies_configured_overrides() {
        let mut configured = BTreeMap::new();
        configured.insert("logbook".to_string(), "CarLogbook".to_string());
        // Points at nothing in the scan; must be dropped
        configured.insert("ghost".to_string(), "no-such-project".to_string());

        let projects = vec![project("CarLogbook", "/dev/CarLogbook", &["carl"])];
        let index = ProjectIndex::assemble(projects, Path::new("/dev"), &configured);

        assert_eq!(
            index.shortcuts.get("logbook"),
            Some(&"CarLogbook".to_string())
        );
        assert!(!index.shortcuts.contains_key("ghost"));
    }

    #[test]
    fn test_validate_accepts_consistent_index() {
        let projects = vec![project("a", "/dev/a", &["a"])];
        let index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let projects = vec![project("a", "/dev/a", &[])];
        let mut index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());
        index.total_count = 2;

        let err = index.validate().unwrap_err();
        assert!(err.contains("totalCount"));
    }

    #[test]
    fn test_validate_rejects_dangling_shortcut() {
        let projects = vec![project("a", "/dev/a", &[])];
        let mut index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());
        index
            .shortcuts
            .insert("x".to_string(), "missing".to_string());

        let err = index.validate().unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_validate_rejects_duplicate_paths() {
        let projects = vec![project("a", "/dev/a", &[]), project("b", "/dev/a", &[])];
        let mut index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());
        index.total_count = 2;

        let err = index.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_staleness_window() {
        let projects = vec![];
        let mut index = ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new());
        let now = Utc::now();

        index.updated_at = now - ChronoDuration::hours(23);
        assert!(!index.is_stale(now));

        index.updated_at = now - ChronoDuration::hours(25);
        assert!(index.is_stale(now));
    }

    #[test]
    fn test_future_updated_at_is_not_stale() {
        let mut index = ProjectIndex::assemble(vec![], Path::new("/dev"), &BTreeMap::new());
        let now = Utc::now();
        index.updated_at = now + ChronoDuration::hours(1);
        assert!(!index.is_stale(now));
    }
}
