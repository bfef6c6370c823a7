//! Configuration types and the configuration file loader.
//!
//! [`ScanConfig`] carries the immutable per-scan parameters; [`FileConfig`]
//! is the optional TOML file whose values act as defaults underneath CLI
//! arguments.

pub mod file;
pub mod scan;

pub use file::FileConfig;
pub use scan::{MAX_DEPTH_LIMIT, ScanConfig, default_excluded_dirs, default_indicators};
