//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use projdex::config::file::expand_tilde;
use projdex::config::{FileConfig, ScanConfig, default_excluded_dirs, default_indicators};
use projdex::resolver::{PERMISSIVE_THRESHOLD, ResolveOptions, STRICT_THRESHOLD};
use projdex::store::IndexStore;
use projdex::utils::size::parse_size;

/// Command-line arguments for controlling directory scanning behavior.
///
/// These options affect how directories are traversed and what counts as a
/// project root during the scanning phase.
#[derive(Parser)]
struct ScanningArgs {
    /// Base directory to scan for projects
    ///
    /// The root directory under which projects are discovered. Defaults to the
    /// config-file `dir` value, falling back to `~/Development`.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Indicator filename that marks a directory as a project root
    ///
    /// Can be specified multiple times. When given, replaces the built-in
    /// indicator set (go.mod, package.json, requirements.txt, ...).
    #[arg(long, action = clap::ArgAction::Append)]
    indicator: Vec<String>,

    /// Directory name to never descend into
    ///
    /// Can be specified multiple times. When given, replaces the built-in
    /// exclusion set (node_modules, vendor, .git, ...).
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Maximum directory depth to scan (1-10)
    ///
    /// Limits how deep into the directory tree the scanner will traverse.
    /// A value of 1 scans only the immediate children of the base directory.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum project subtree size
    ///
    /// Directories whose total content is smaller than this are rejected even
    /// when an indicator file is present. Supports KB/MB/GB (base 1000),
    /// KiB/MiB/GiB (base 1024), and plain byte counts. `0` disables the gate.
    #[arg(long)]
    min_size: Option<String>,

    /// Show non-fatal warnings collected during scanning
    ///
    /// When enabled, displays unreadable directories and malformed manifests
    /// encountered during the scan. Useful for debugging permission issues.
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Command-line arguments for query resolution.
#[derive(Parser)]
struct ResolverArgs {
    /// Lower the match threshold from 0.7 to 0.5
    ///
    /// Permissive mode accepts looser matches; use it when strict resolution
    /// keeps coming up empty for queries you expect to match.
    #[arg(long)]
    permissive: bool,

    /// Explicit similarity threshold in [0, 1]
    ///
    /// Overrides both `--permissive` and the config-file value. A project
    /// matches when its best token similarity reaches this value.
    #[arg(long)]
    threshold: Option<f64>,

    /// Resolve against a flat JSON list of `{name, path}` entries
    ///
    /// Bypasses the persisted index entirely and scores the query against
    /// the entries in the given file instead.
    #[arg(long)]
    entries: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the project index now, ignoring freshness
    Scan,
    /// Show index location, freshness, and counts
    Status,
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// This struct defines the complete command-line interface for the projdex
/// tool, combining all argument groups and providing the main entry point for
/// command parsing. Without a subcommand, the positional words are treated as
/// a query and resolved against the index.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values
/// act as defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "projdex")]
#[command(about = "Index development projects and resolve fuzzy queries to their paths")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand (e.g. `scan`, `status`, `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Free-text query to resolve against the index
    ///
    /// The default action. Multiple words are joined into one query:
    /// `projdex show taqwa main.go` resolves to the `taqwa` project path.
    #[arg(num_args = 0..)]
    query: Vec<String>,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// When enabled, all human-readable output (colors, progress bars) is
    /// suppressed and a single JSON document is printed to stdout.
    #[arg(long)]
    json: bool,

    /// Location of the persisted index file
    ///
    /// Defaults to the config-file `index_file` value, falling back to
    /// `~/.cache/projdex/index.json`.
    #[arg(long)]
    index_file: Option<PathBuf>,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,

    /// Resolver options
    #[command(flatten)]
    resolving: ResolverArgs,
}

impl Cli {
    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Whether `--verbose` warning output is enabled.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.scanning.verbose
    }

    /// The positional words joined into a single query string.
    #[must_use]
    pub fn query(&self) -> String {
        self.query.join(" ")
    }

    /// Flat entries file given via `--entries`, if any.
    #[must_use]
    pub const fn entries_file(&self) -> Option<&PathBuf> {
        self.resolving.entries.as_ref()
    }

    /// Build the validated scan configuration from CLI args and config file.
    ///
    /// Priority for every field: CLI argument > config file > hardcoded
    /// default. A relative `--dir` is made absolute against the current
    /// working directory before validation.
    ///
    /// # Errors
    ///
    /// Returns an error when the minimum size string cannot be parsed, the
    /// current directory cannot be determined, or the assembled configuration
    /// fails [`ScanConfig::validate`].
    pub fn scan_config(&self, config: &FileConfig) -> Result<ScanConfig> {
        let defaults = ScanConfig::default();

        let base = self
            .scanning
            .dir
            .clone()
            .or_else(|| config.dir.clone())
            .map_or(defaults.base_path, |d| expand_tilde(&d));
        let base_path = if base.is_absolute() {
            base
        } else {
            std::env::current_dir()
                .context("Failed to determine the current directory")?
                .join(base)
        };

        let indicators = if self.scanning.indicator.is_empty() {
            config
                .scanning
                .indicators
                .clone()
                .unwrap_or_else(default_indicators)
        } else {
            self.scanning.indicator.clone()
        };

        let excluded_dirs = if self.scanning.exclude.is_empty() {
            config
                .scanning
                .exclude
                .clone()
                .unwrap_or_else(default_excluded_dirs)
        } else {
            self.scanning.exclude.clone()
        };

        let min_project_size = match self
            .scanning
            .min_size
            .as_ref()
            .or(config.scanning.min_project_size.as_ref())
        {
            Some(size_str) => parse_size(size_str)
                .with_context(|| format!("Invalid minimum project size '{size_str}'"))?,
            None => defaults.min_project_size,
        };

        let scan_config = ScanConfig {
            base_path,
            indicators,
            excluded_dirs,
            max_depth: self
                .scanning
                .max_depth
                .or(config.scanning.max_depth)
                .unwrap_or(defaults.max_depth),
            min_project_size,
            shortcuts: config.shortcuts.clone(),
            update_schedule: config
                .scanning
                .update_schedule
                .clone()
                .unwrap_or_default(),
        };

        scan_config.validate()?;
        Ok(scan_config)
    }

    /// Build the index store from CLI args and config file.
    ///
    /// Priority: `--index-file` > config file `index_file` > the default
    /// cache location.
    #[must_use]
    pub fn index_store(&self, config: &FileConfig) -> IndexStore {
        let path = self
            .index_file
            .clone()
            .or_else(|| config.index_file.clone())
            .map_or_else(FileConfig::default_index_path, |p| expand_tilde(&p));

        IndexStore::new(path)
    }

    /// Extract resolver options from CLI args and config file.
    ///
    /// Priority: `--threshold` > `--permissive` > config file `threshold` >
    /// the strict default (0.7).
    #[must_use]
    pub fn resolve_options(&self, config: &FileConfig) -> ResolveOptions {
        let threshold = self.resolving.threshold.unwrap_or_else(|| {
            if self.resolving.permissive {
                PERMISSIVE_THRESHOLD
            } else {
                config.resolver.threshold.unwrap_or(STRICT_THRESHOLD)
            }
        });

        ResolveOptions { threshold }
    }
}
