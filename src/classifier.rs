//! Directory classification: turning a directory tree into projects.
//!
//! This module walks a directory tree bounded by depth and exclusion rules
//! and decides, per directory, whether it is a project root. A directory
//! qualifies as soon as one of the configured indicator files exists directly
//! under it; from there the classifier infers a type and tech stack, extracts
//! a purpose line from the README, reads git recency metadata, and derives
//! shortcut aliases. Classification is a leaf test: once a directory is a
//! project, its subtree is never descended into again, so projects never
//! nest.
//!
//! The walk is an explicit worklist of `(directory, depth)` pairs rather than
//! recursion, so cancellation is checked on every pop and the depth bound is
//! enforced per node. Unreadable directories degrade that branch only; the
//! scan as a whole always completes with whatever was found.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use thiserror::Error;

use crate::{
    cancel::CancelToken,
    config::ScanConfig,
    project::{Project, ProjectStatus, ProjectType},
    utils::{dir_size_capped, read_last_commit},
};

/// Names accepted as a README when extracting a purpose line.
const README_NAMES: &[&str] = &["README.md", "README", "readme.md"];

/// How many non-heading, non-blank README lines to inspect for a purpose.
const PURPOSE_SCAN_LINES: usize = 10;

/// Purpose lines must be at least this long to count as descriptive.
const PURPOSE_MIN_LEN: usize = 10;

/// Purpose lines longer than this are skipped.
const PURPOSE_MAX_LEN: usize = 200;

/// Returned when a scan is cancelled through its [`CancelToken`].
#[derive(Debug, Error)]
#[error("scan cancelled")]
pub struct ScanCancelled;

/// Everything one classification pass produced.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Discovered projects in traversal order
    pub projects: Vec<Project>,

    /// Non-fatal problems encountered along the way (unreadable
    /// directories, malformed manifests). Printed under `--verbose`.
    pub warnings: Vec<String>,
}

/// Rule-based recursive directory classifier.
pub struct Classifier<'a> {
    config: &'a ScanConfig,
    cancel: CancelToken,
}

impl<'a> Classifier<'a> {
    /// Create a classifier for one scan configuration.
    #[must_use]
    pub const fn new(config: &'a ScanConfig, cancel: CancelToken) -> Self {
        Self { config, cancel }
    }

    /// Walk the tree under `config.base_path` and classify every directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanCancelled`] when the token is tripped mid-walk. I/O
    /// problems never fail the scan; they are recorded as warnings and the
    /// affected branch is skipped.
    pub fn classify(&self) -> Result<ScanOutcome, ScanCancelled> {
        let mut projects = Vec::new();
        let mut warnings = Vec::new();
        let mut worklist = vec![(self.config.base_path.clone(), 0usize)];

        while let Some((dir, depth)) = worklist.pop() {
            if self.cancel.is_cancelled() {
                return Err(ScanCancelled);
            }

            if depth >= self.config.max_depth {
                continue;
            }

            let found = self.indicators_in(&dir);
            if !found.is_empty() {
                // Leaf test fired: this branch is done either way.
                if self.passes_size_gate(&dir) {
                    projects.push(self.build_project(&dir, found, &mut warnings));
                }
                continue;
            }

            self.push_children(&dir, depth, &mut worklist, &mut warnings);
        }

        Ok(ScanOutcome { projects, warnings })
    }

    /// List the child directories of `dir` onto the worklist, skipping
    /// hidden and excluded names. Children are pushed in reverse name order
    /// so they pop alphabetically, keeping scans deterministic.
    fn push_children(
        &self,
        dir: &Path,
        depth: usize,
        worklist: &mut Vec<(PathBuf, usize)>,
        warnings: &mut Vec<String>,
    ) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warnings.push(format!("Error reading {}: {e}", dir.display()));
                return;
            }
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_type()
                    .is_ok_and(|file_type| file_type.is_dir())
            })
            .map(|entry| entry.path())
            .filter(|path| self.should_descend(path))
            .collect();

        children.sort();
        for child in children.into_iter().rev() {
            worklist.push((child, depth + 1));
        }
    }

    /// Whether traversal may descend into the given directory.
    ///
    /// Hidden directories (leading `.`) and names on the exclusion list are
    /// never descended into, regardless of the remaining depth budget.
    fn should_descend(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        !name.starts_with('.') && !self.config.excluded_dirs.iter().any(|d| d == name)
    }

    /// Return the configured indicators that exist directly under `dir`,
    /// preserving the configured order.
    fn indicators_in(&self, dir: &Path) -> Vec<String> {
        self.config
            .indicators
            .iter()
            .filter(|indicator| dir.join(indicator).exists())
            .cloned()
            .collect()
    }

    /// Apply the minimum-size gate, if one is configured.
    fn passes_size_gate(&self, dir: &Path) -> bool {
        let min = self.config.min_project_size;
        if min == 0 {
            return true;
        }

        dir_size_capped(dir, min) >= min
    }

    /// Assemble the full project record for a classified directory.
    fn build_project(
        &self,
        dir: &Path,
        key_files: Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Project {
        let name = dir
            .file_name()
            .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned());

        let (kind, tech_stack) = self.infer_type(dir, &key_files, warnings);
        let last_commit = read_last_commit(dir);
        let status = ProjectStatus::from_last_commit(last_commit, Utc::now());
        let shortcuts = self.shortcuts_for(&name);

        Project {
            name,
            path: dir.to_path_buf(),
            kind,
            tech_stack,
            purpose: extract_purpose(dir),
            key_files,
            status,
            last_commit,
            shortcuts,
            metadata: std::collections::BTreeMap::new(),
        }
    }

    /// Priority-ordered type inference; the first matching rule wins.
    ///
    /// A directory with both a `go.mod` and a `package.json` is classified
    /// by the Go rule alone; the cascade never combines rules.
    fn infer_type(
        &self,
        dir: &Path,
        key_files: &[String],
        warnings: &mut Vec<String>,
    ) -> (ProjectType, Vec<String>) {
        let has = |name: &str| key_files.iter().any(|f| f == name);

        if has("go.mod") {
            let mut tags = vec!["go".to_string()];
            if has_vue_marker(dir, warnings) {
                tags.push("vue".to_string());
            }
            return (ProjectType::Go, tags);
        }

        if has("package.json") {
            if has_vue_marker(dir, warnings) {
                return (
                    ProjectType::Vue,
                    vec!["nodejs".to_string(), "vue".to_string()],
                );
            }
            if has_react_marker(dir, warnings) {
                return (
                    ProjectType::Nodejs,
                    vec!["nodejs".to_string(), "react".to_string()],
                );
            }
            return (ProjectType::Nodejs, vec!["nodejs".to_string()]);
        }

        if has("requirements.txt") || has("pyproject.toml") || has("setup.py") {
            return (ProjectType::Python, vec!["python".to_string()]);
        }

        if key_files.iter().all(|f| README_NAMES.contains(&f.as_str())) {
            return (ProjectType::Documentation, vec![]);
        }

        (ProjectType::Unknown, vec![])
    }

    /// Shortcut aliases for a project name.
    ///
    /// Configured aliases whose canonical name matches case-insensitively
    /// take precedence; otherwise one alias is synthesised from the
    /// lowercased name (whole name when 4 characters or fewer, its first 4
    /// characters otherwise), so every project has at least one alias.
    fn shortcuts_for(&self, name: &str) -> Vec<String> {
        let configured: Vec<String> = self
            .config
            .shortcuts
            .iter()
            .filter(|(_, canonical)| canonical.eq_ignore_ascii_case(name))
            .map(|(alias, _)| alias.to_lowercase())
            .collect();

        if !configured.is_empty() {
            return configured;
        }

        let lower = name.to_lowercase();
        let alias = if lower.chars().count() <= 4 {
            lower
        } else {
            lower.chars().take(4).collect()
        };

        vec![alias]
    }
}

/// Whether the directory carries Vue marker files or a `vue` dependency.
fn has_vue_marker(dir: &Path, warnings: &mut Vec<String>) -> bool {
    if dir.join("vue.config.js").exists() || dir.join("src").join("App.vue").exists() {
        return true;
    }

    manifest_has_dependency(dir, "vue", warnings)
}

/// Whether the directory carries React marker files or a `react` dependency.
fn has_react_marker(dir: &Path, warnings: &mut Vec<String>) -> bool {
    if dir.join("src").join("App.jsx").exists() || dir.join("src").join("App.tsx").exists() {
        return true;
    }

    manifest_has_dependency(dir, "react", warnings)
}

/// Look for a dependency name in `package.json`'s `dependencies` or
/// `devDependencies` tables. Parse failures are recorded as warnings and
/// treated as "not present".
fn manifest_has_dependency(dir: &Path, dependency: &str, warnings: &mut Vec<String>) -> bool {
    let manifest = dir.join("package.json");
    if !manifest.exists() {
        return false;
    }

    let content = match fs::read_to_string(&manifest) {
        Ok(content) => content,
        Err(e) => {
            warnings.push(format!("Error reading {}: {e}", manifest.display()));
            return false;
        }
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(json) => ["dependencies", "devDependencies"].iter().any(|table| {
            json.get(table)
                .and_then(|deps| deps.get(dependency))
                .is_some()
        }),
        Err(e) => {
            warnings.push(format!("Error parsing {}: {e}", manifest.display()));
            false
        }
    }
}

/// Extract a short purpose string from the directory's README, if any.
///
/// Heading lines (leading `#`) and blank lines are skipped; the first
/// remaining line whose length falls within 10..=200 characters wins,
/// looking at no more than the first 10 candidate lines. This picks the
/// first plausible descriptive sentence, it does not summarise.
fn extract_purpose(dir: &Path) -> String {
    let Some(content) = README_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .and_then(|path| fs::read_to_string(path).ok())
    else {
        return String::new();
    };

    let mut inspected = 0;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        inspected += 1;
        if inspected > PURPOSE_SCAN_LINES {
            break;
        }

        let len = line.chars().count();
        if (PURPOSE_MIN_LEN..=PURPOSE_MAX_LEN).contains(&len) {
            return line.to_string();
        }
    }

    String::new()
}
