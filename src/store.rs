//! Index persistence and lifecycle.
//!
//! The [`IndexStore`] owns the location of the persisted index document and
//! the rules around it: structural validation before every save, whole-file
//! replacement on write, and the staleness window that makes the index
//! self-healing. Callers ask for the current index with
//! [`IndexStore::get_current`] and never manage refresh scheduling
//! themselves: a missing, corrupt, invalid, or stale index transparently
//! triggers a fresh scan.

use std::{fs, path::PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::{
    cancel::CancelToken,
    classifier::Classifier,
    config::ScanConfig,
    project::ProjectIndex,
};

/// Failures of index load/save/rebuild operations.
///
/// `NotFound` and `Corrupt` are deliberately distinct: a caller may treat a
/// missing index as first-run state while forcing a rescan on corruption.
/// [`IndexStore::get_current`] maps both to a rebuild.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No index file exists yet; an expected first-run outcome
    #[error("no index has been written yet")]
    NotFound,

    /// The index file exists but could not be parsed
    #[error("index file is corrupt: {0}")]
    Corrupt(String),

    /// The index violates a structural invariant (count mismatch,
    /// dangling shortcut, duplicate path) or the scan config is unusable
    #[error("invalid index: {0}")]
    Invalid(String),

    /// The scan was cancelled through its token before completing
    #[error("scan cancelled")]
    Cancelled,

    /// Underlying filesystem failure while reading or writing the index
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result of a scan or a `get_current` call.
#[derive(Debug)]
pub struct ScanReport {
    /// The assembled (or loaded) index
    pub index: ProjectIndex,

    /// Classifier warnings; empty when the index was loaded from disk
    pub warnings: Vec<String>,

    /// Whether a fresh scan was performed (as opposed to a cache hit)
    pub rebuilt: bool,
}

/// Owns the persisted index file and its refresh lifecycle.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Create a store persisting to the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Where the index document lives on disk.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Run a full scan and assemble a fresh index without persisting it.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Invalid`] for an unusable scan configuration
    /// and [`IndexError::Cancelled`] when the token is tripped mid-scan.
    pub fn scan(config: &ScanConfig, cancel: CancelToken) -> Result<ScanReport, IndexError> {
        config
            .validate()
            .map_err(|e| IndexError::Invalid(e.to_string()))?;

        let outcome = Classifier::new(config, cancel)
            .classify()
            .map_err(|_| IndexError::Cancelled)?;

        let index = ProjectIndex::assemble(outcome.projects, &config.base_path, &config.shortcuts);

        Ok(ScanReport {
            index,
            warnings: outcome.warnings,
            rebuilt: true,
        })
    }

    /// Load the persisted index.
    ///
    /// # Errors
    ///
    /// - [`IndexError::NotFound`] when no index file exists (not an error
    ///   path for callers that treat it as first-run state)
    /// - [`IndexError::Corrupt`] when the document cannot be parsed
    /// - [`IndexError::Invalid`] when it parses but violates an invariant
    pub fn load(&self) -> Result<ProjectIndex, IndexError> {
        if !self.path.exists() {
            return Err(IndexError::NotFound);
        }

        let content = fs::read_to_string(&self.path)?;
        let index: ProjectIndex =
            serde_json::from_str(&content).map_err(|e| IndexError::Corrupt(e.to_string()))?;

        index.validate().map_err(IndexError::Invalid)?;
        Ok(index)
    }

    /// Persist an index, replacing the previous document wholesale.
    ///
    /// Validation happens before anything touches the disk, and the write
    /// goes through a temporary file followed by a rename, so a rejected or
    /// interrupted save leaves the prior index intact.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Invalid`] for an index violating a structural
    /// invariant, or an I/O error from the write itself.
    pub fn save(&self, index: &ProjectIndex) -> Result<(), IndexError> {
        index.validate().map_err(IndexError::Invalid)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(index)
            .map_err(|e| IndexError::Invalid(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Load the current index, rebuilding it when missing, unreadable, or
    /// older than the freshness window.
    ///
    /// Rebuilds are persisted before returning. Concurrent callers may race
    /// to rebuild; that is acceptable because rebuilds are idempotent and
    /// the last writer's whole-file replacement becomes canonical.
    ///
    /// # Errors
    ///
    /// Returns scan or save errors from the rebuild path; plain staleness
    /// or absence never surfaces as an error.
    pub fn get_current(
        &self,
        config: &ScanConfig,
        cancel: CancelToken,
    ) -> Result<ScanReport, IndexError> {
        match self.load() {
            Ok(index) if !index.is_stale(Utc::now()) => Ok(ScanReport {
                index,
                warnings: vec![],
                rebuilt: false,
            }),
            Ok(_)
            | Err(IndexError::NotFound | IndexError::Corrupt(_) | IndexError::Invalid(_)) => {
                let report = Self::scan(config, cancel)?;
                self.save(&report.index)?;
                Ok(report)
            }
            Err(e) => Err(e),
        }
    }
}
