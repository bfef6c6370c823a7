//! Scan configuration for project discovery.
//!
//! This module defines the immutable per-scan parameters that control how the
//! classifier traverses the directory tree and which directories qualify as
//! projects.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Result, bail};

/// Deepest recursion the classifier will ever accept.
pub const MAX_DEPTH_LIMIT: usize = 10;

/// Immutable per-scan parameters.
///
/// Built once (from the config file and CLI arguments) and passed by
/// reference into the classifier and the index store. Validated with
/// [`ScanConfig::validate`] before any traversal starts.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Absolute root directory to scan
    pub base_path: PathBuf,

    /// Ordered set of filenames/dirnames that mark a project root
    pub indicators: Vec<String>,

    /// Directory names never descended into
    pub excluded_dirs: Vec<String>,

    /// Recursion bound; depth 0 is `base_path` itself. Must be in 1..=10
    /// to prevent runaway traversal of deep or symlink-cyclic trees.
    pub max_depth: usize,

    /// Directories whose subtree holds fewer bytes than this are rejected
    /// even when indicators are present. 0 disables the gate.
    pub min_project_size: u64,

    /// User-configured alias -> canonical project name overrides
    pub shortcuts: BTreeMap<String, String>,

    /// Opaque cron-like rebuild schedule; stored, never interpreted here
    pub update_schedule: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_path: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/"))
                .join("Development"),
            indicators: default_indicators(),
            excluded_dirs: default_excluded_dirs(),
            max_depth: 3,
            min_project_size: 1024,
            shortcuts: BTreeMap::new(),
            update_schedule: String::new(),
        }
    }
}

/// Default indicator files: module files, package manifests, requirements
/// files, READMEs, VCS metadata, container and build files.
#[must_use]
pub fn default_indicators() -> Vec<String> {
    [
        "go.mod",
        "package.json",
        "requirements.txt",
        "pyproject.toml",
        "setup.py",
        "README.md",
        ".git",
        "Dockerfile",
        "Makefile",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Default directories that are never descended into.
#[must_use]
pub fn default_excluded_dirs() -> Vec<String> {
    [
        "node_modules",
        "vendor",
        ".git",
        "target",
        "build",
        "dist",
        "tmp",
        "__pycache__",
        ".venv",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl ScanConfig {
    /// Check the configuration invariants before a scan.
    ///
    /// # Errors
    ///
    /// Returns an error when:
    /// - `base_path` is not absolute
    /// - `max_depth` is 0 or greater than [`MAX_DEPTH_LIMIT`]
    /// - `indicators` is empty (nothing could ever be classified)
    pub fn validate(&self) -> Result<()> {
        if !self.base_path.is_absolute() {
            bail!(
                "base path must be absolute, got: {}",
                self.base_path.display()
            );
        }

        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            bail!(
                "max depth must be between 1 and {MAX_DEPTH_LIMIT}, got: {}",
                self.max_depth
            );
        }

        if self.indicators.is_empty() {
            bail!("at least one indicator file is required");
        }

        Ok(())
    }
}
