//! # projdex
//!
//! A CLI tool that discovers development projects under a base directory,
//! keeps a persisted index of them, and resolves free-text queries to
//! project paths.
//!
//! Projects are detected by indicator files (go.mod, package.json, ...) and
//! enriched with an inferred type, a purpose line from the README, an
//! activity status from git commit recency, and shortcut aliases. The index
//! is cached on disk for 24 hours and rebuilt transparently when stale,
//! missing, or corrupt.
//!
//! ## Usage
//!
//! ```bash
//! # Rebuild the index now
//! projdex scan
//!
//! # Resolve a query to a project path (the default action)
//! cd "$(projdex taqwa)"
//!
//! # Looser matching
//! projdex --permissive show me the car logbook
//!
//! # Index freshness and counts
//! projdex status
//! ```

mod cli;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use humansize::{DECIMAL, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use projdex::{
    cancel::CancelToken,
    config::FileConfig,
    output::{ResolveJsonOutput, ScanJsonOutput, StatusJsonOutput},
    resolver::{self, FlatEntry},
    store::{IndexError, IndexStore},
};
use std::process::exit;

/// Entry point for the projdex application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and
/// printing any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// Dispatches to the `scan`, `status`, or `config` subcommand, or treats the
/// positional arguments as a query to resolve against the index.
///
/// # Errors
///
/// Returns errors from config loading, directory scanning, index persistence,
/// or JSON serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let json_mode = args.json();
    let file_config = load_config(json_mode);
    let store = args.index_store(&file_config);

    match &args.subcommand {
        Some(Commands::Scan) => run_scan(&args, &file_config, &store),
        Some(Commands::Status) => run_status(&store, json_mode),
        Some(Commands::Config { .. }) => Ok(()),
        None => run_resolve(&args, &file_config, &store),
    }
}

/// Rebuild the index unconditionally and persist it.
fn run_scan(args: &Cli, config: &FileConfig, store: &IndexStore) -> Result<()> {
    let scan_config = args.scan_config(config)?;

    let progress = scan_progress(args.json());
    let report = IndexStore::scan(&scan_config, CancelToken::new())?;
    store.save(&report.index)?;
    progress.finish_and_clear();

    if args.json() {
        let output = ScanJsonOutput::from_index(&report.index, &report.warnings);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Indexed {} projects under {}",
        report.index.total_count,
        report.index.scan_path.display()
    );
    for project in &report.index.projects {
        println!("  {project}");
    }
    print_warnings(&report.warnings, args.verbose());
    println!("\n{} {}", "Index written to".green(), store.path().display());

    Ok(())
}

/// Report index location, freshness, and counts without rebuilding anything.
fn run_status(store: &IndexStore, json_mode: bool) -> Result<()> {
    let index = match store.load() {
        Ok(index) => index,
        Err(IndexError::NotFound) => bail!(
            "No index found at {} (run `projdex scan` first)",
            store.path().display()
        ),
        Err(e) => return Err(e.into()),
    };

    let size = std::fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);

    if json_mode {
        let output = StatusJsonOutput::from_index(&index, store.path(), size);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let freshness = if index.is_stale(Utc::now()) {
        "stale".yellow()
    } else {
        "fresh".green()
    };

    println!("Index file: {}", store.path().display());
    println!("Size:       {}", format_size(size, DECIMAL));
    println!("Updated:    {} ({freshness})", index.updated_at);
    println!("Projects:   {}", index.total_count);
    println!("Shortcuts:  {}", index.shortcuts.len());

    Ok(())
}

/// Resolve the positional query against the index (or a flat entries file).
///
/// The winning project path is printed to stdout so the command composes with
/// `cd "$(projdex ...)"`; everything else goes to stderr. Exits with status 1
/// when nothing clears the threshold.
fn run_resolve(args: &Cli, config: &FileConfig, store: &IndexStore) -> Result<()> {
    let query = args.query();
    if query.is_empty() {
        bail!("No query given (run `projdex --help` for usage)");
    }
    let options = args.resolve_options(config);

    let result = if let Some(entries_file) = args.entries_file() {
        let content = std::fs::read_to_string(entries_file).with_context(|| {
            format!("Failed to read entries file {}", entries_file.display())
        })?;
        let entries: Vec<FlatEntry> = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse entries file {}", entries_file.display())
        })?;
        resolver::resolve_entries(&query, &entries, options)
    } else {
        let scan_config = args.scan_config(config)?;

        let progress = scan_progress(args.json());
        let report = store.get_current(&scan_config, CancelToken::new())?;
        progress.finish_and_clear();

        if report.rebuilt {
            print_warnings(&report.warnings, args.verbose());
        }
        resolver::resolve(&query, &report.index, options)
    };

    if args.json() {
        let output = ResolveJsonOutput::from_result(result.as_ref());
        println!("{}", serde_json::to_string_pretty(&output)?);
        if result.is_none() {
            exit(1);
        }
        return Ok(());
    }

    match result {
        Some(hit) => {
            println!("{}", hit.path.display());
            eprintln!(
                "{} {} (score {:.2})",
                "Matched".green(),
                hit.name.bold(),
                hit.score
            );
        }
        None => {
            eprintln!("{}", "No project matched the query.".yellow());
            eprintln!(
                "Try --permissive for looser matching, or `projdex scan` to refresh the index."
            );
            exit(1);
        }
    }

    Ok(())
}

// ── Helper functions ────────────────────────────────────────────────────

/// Build the scanning spinner, hidden in JSON mode.
fn scan_progress(quiet: bool) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Scanning...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Print scan warnings to stderr; collapsed to a count unless `--verbose`.
fn print_warnings(warnings: &[String], verbose: bool) {
    if warnings.is_empty() {
        return;
    }

    if verbose {
        for warning in warnings {
            eprintln!("{} {warning}", "Warning:".yellow());
        }
    } else {
        eprintln!(
            "{}",
            format!(
                "{} warnings during scan (re-run with --verbose to see them)",
                warnings.len()
            )
            .yellow()
        );
    }
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        std::result::Result::Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# projdex configuration
# All values shown are their defaults. Uncomment and change as needed.

# Base directory to scan for projects
# dir = "~/Development"

# Location of the persisted index file
# index_file = "~/.cache/projdex/index.json"

[scanning]
# Indicator files that mark a directory as a project root
# indicators = ["go.mod", "package.json", "requirements.txt", "pyproject.toml", "setup.py", "README.md", ".git", "Dockerfile", "Makefile"]

# Directory names to never descend into
# exclude = ["node_modules", "vendor", ".git", "target", "build", "dist", "tmp", "__pycache__", ".venv"]

# Maximum directory depth to scan (1-10)
# max_depth = 3

# Minimum project subtree size; smaller directories are rejected ("0" disables)
# min_project_size = "1KB"

# Cron-like schedule recorded alongside the index (for external schedulers)
# update_schedule = ""

[resolver]
# Similarity threshold in [0, 1]; lower values match more loosely
# threshold = 0.7

[shortcuts]
# Alias -> canonical project name overrides
# logbook = "car-logbook"
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_str(val: Option<&str>, default: &str) -> String {
        val.map_or_else(
            || format!("\"{default}\"  (default)"),
            |v| format!("\"{v}\""),
        )
    }
    fn show_usize(val: Option<usize>, default: usize) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_f64(val: Option<f64>, default: f64) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_list(val: Option<&[String]>, default: &[String]) -> String {
        let render = |items: &[String]| {
            let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
            format!("[{}]", quoted.join(", "))
        };
        val.map_or_else(|| format!("{}  (default)", render(default)), render)
    }

    let dir_str = config.dir.as_ref().map_or_else(
        || "\"~/Development\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );
    let index_str = config.index_file.as_ref().map_or_else(
        || format!("\"{}\"  (default)", FileConfig::default_index_path().display()),
        |p| format!("\"{}\"", p.display()),
    );
    let shortcuts_str = if config.shortcuts.is_empty() {
        "(none)".to_string()
    } else {
        config
            .shortcuts
            .iter()
            .map(|(alias, name)| format!("{alias} = \"{name}\""))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "\
dir         = {dir}
index_file  = {index_file}

[scanning]
indicators       = {indicators}
exclude          = {exclude}
max_depth        = {max_depth}
min_project_size = {min_project_size}
update_schedule  = {update_schedule}

[resolver]
threshold   = {threshold}

[shortcuts]
{shortcuts}",
        dir = dir_str,
        index_file = index_str,
        indicators = show_list(
            config.scanning.indicators.as_deref(),
            &projdex::config::default_indicators()
        ),
        exclude = show_list(
            config.scanning.exclude.as_deref(),
            &projdex::config::default_excluded_dirs()
        ),
        max_depth = show_usize(config.scanning.max_depth, 3),
        min_project_size = show_str(config.scanning.min_project_size.as_deref(), "1KB"),
        update_schedule = show_str(config.scanning.update_schedule.as_deref(), ""),
        threshold = show_f64(config.resolver.threshold, 0.7),
        shortcuts = shortcuts_str,
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}
