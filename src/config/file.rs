//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/projdex/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! dir = "~/Development"
//! index_file = "~/.cache/projdex/index.json"
//!
//! [scanning]
//! indicators = ["go.mod", "package.json", "README.md"]
//! exclude = ["node_modules", "vendor", ".git"]
//! max_depth = 3
//! min_project_size = "1KB"
//! update_schedule = "0 3 * * *"
//!
//! [resolver]
//! threshold = 0.7
//!
//! [shortcuts]
//! logbook = "car-logbook"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default base directory to scan for projects
    pub dir: Option<PathBuf>,

    /// Location of the persisted index file
    pub index_file: Option<PathBuf>,

    /// Scanning options
    #[serde(default)]
    pub scanning: FileScanConfig,

    /// Resolver options
    #[serde(default)]
    pub resolver: FileResolverConfig,

    /// Alias -> canonical project name overrides
    #[serde(default)]
    pub shortcuts: std::collections::BTreeMap<String, String>,
}

/// Scanning options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileScanConfig {
    /// Indicator files that mark a directory as a project root
    pub indicators: Option<Vec<String>>,

    /// Directory names to never descend into
    pub exclude: Option<Vec<String>>,

    /// Maximum directory depth to scan (1..=10)
    pub max_depth: Option<usize>,

    /// Minimum project subtree size (e.g. `"1KB"`, `"50KiB"`, `"2048"`)
    pub min_project_size: Option<String>,

    /// Opaque cron-like rebuild schedule recorded in the scan config
    pub update_schedule: Option<String>,
}

/// Resolver options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileResolverConfig {
    /// Similarity threshold in `[0, 1]`; lower values match more loosely
    pub threshold: Option<f64>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/projdex/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux/macOS, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("projdex").join("config.toml"))
    }

    /// Default location of the persisted index when the config file does not
    /// override it: `<cache_dir>/projdex/index.json`.
    #[must_use]
    pub fn default_index_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("projdex")
            .join("index.json")
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    /// If the file exists but is malformed, returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.dir.is_none());
        assert!(config.index_file.is_none());
        assert!(config.scanning.indicators.is_none());
        assert!(config.scanning.exclude.is_none());
        assert!(config.scanning.max_depth.is_none());
        assert!(config.scanning.min_project_size.is_none());
        assert!(config.scanning.update_schedule.is_none());
        assert!(config.resolver.threshold.is_none());
        assert!(config.shortcuts.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
dir = "~/Development"
index_file = "~/.cache/projdex/index.json"

[scanning]
indicators = ["go.mod", "package.json"]
exclude = ["node_modules", ".git"]
max_depth = 5
min_project_size = "1KB"
update_schedule = "0 3 * * *"

[resolver]
threshold = 0.5

[shortcuts]
logbook = "car-logbook"
tq = "taqwa"
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.dir, Some(PathBuf::from("~/Development")));
        assert_eq!(
            config.index_file,
            Some(PathBuf::from("~/.cache/projdex/index.json"))
        );
        assert_eq!(
            config.scanning.indicators,
            Some(vec!["go.mod".to_string(), "package.json".to_string()])
        );
        assert_eq!(
            config.scanning.exclude,
            Some(vec!["node_modules".to_string(), ".git".to_string()])
        );
        assert_eq!(config.scanning.max_depth, Some(5));
        assert_eq!(config.scanning.min_project_size, Some("1KB".to_string()));
        assert_eq!(
            config.scanning.update_schedule,
            Some("0 3 * * *".to_string())
        );
        assert_eq!(config.resolver.threshold, Some(0.5));
        assert_eq!(
            config.shortcuts.get("logbook"),
            Some(&"car-logbook".to_string())
        );
        assert_eq!(config.shortcuts.get("tq"), Some(&"taqwa".to_string()));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r"
[scanning]
max_depth = 2
";

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.dir.is_none());
        assert_eq!(config.scanning.max_depth, Some(2));
        assert!(config.scanning.indicators.is_none());
        assert!(config.resolver.threshold.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.dir.is_none());
        assert!(config.index_file.is_none());
        assert!(config.shortcuts.is_empty());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"
[scanning]
max_depth = "not_a_number"
"#;
        let result = toml::from_str::<FileConfig>(toml_content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        let path = FileConfig::config_path();
        if let Some(p) = path {
            assert!(p.ends_with("projdex/config.toml"));
        }
    }

    #[test]
    fn test_default_index_path_suffix() {
        let path = FileConfig::default_index_path();
        assert!(path.ends_with("projdex/index.json"));
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let path = PathBuf::from("~/Development");
        let expanded = expand_tilde(&path);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("Development"));
        }
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let path = PathBuf::from("/absolute/path");
        assert_eq!(expand_tilde(&path), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_tilde_relative_path_unchanged() {
        let path = PathBuf::from("relative/path");
        assert_eq!(expand_tilde(&path), PathBuf::from("relative/path"));
    }
}
