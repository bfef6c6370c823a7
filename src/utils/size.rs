//! Size parsing and directory size measurement.
//!
//! This module provides a capped subtree size measurement used by the
//! classifier's minimum-size gate, and a parser for human-readable size
//! strings (like "1KB" or "50MiB") used by the config layer.

use std::path::Path;

use anyhow::Result;
use walkdir::WalkDir;

/// Measure the total size of a directory subtree, stopping early at `cap`.
///
/// Recursively traverses the tree with `walkdir` and sums file sizes.
/// Traversal stops as soon as the running total reaches `cap`, which bounds
/// the cost on huge trees: the caller only needs to know whether the subtree
/// reaches a threshold, not its exact size. Errors for individual entries
/// (permission denied, broken symlinks, etc.) are silently skipped.
///
/// Returns at most `cap`; `0` if the path does not exist.
#[must_use]
pub fn dir_size_capped(path: &Path, cap: u64) -> u64 {
    if cap == 0 {
        return 0;
    }

    let mut total = 0u64;

    for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file()
            && let Ok(metadata) = entry.metadata()
        {
            total = total.saturating_add(metadata.len());
            if total >= cap {
                return cap;
            }
        }
    }

    total
}

/// Parse a human-readable size string into bytes.
///
/// Supports decimal (KB, MB, GB) and binary (KiB, MiB, GiB) units as well as
/// plain byte counts.
///
/// # Errors
///
/// Returns an error if the string is empty, the number cannot be parsed,
/// or the resulting value would overflow `u64`.
///
/// # Supported Units
///
/// - **Decimal**: KB (1000), MB (1000²), GB (1000³)
/// - **Binary**: KiB (1024), MiB (1024²), GiB (1024³)
/// - **Bytes**: plain numbers without units
pub fn parse_size(size_str: &str) -> Result<u64> {
    if size_str == "0" {
        return Ok(0);
    }

    let size_str = size_str.to_uppercase();
    let (number_str, multiplier) = parse_size_unit(&size_str);

    let number: u64 = number_str.parse()?;
    number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size value overflow: {number} * {multiplier}"))
}

/// Parse the unit suffix and return the numeric part with its multiplier.
fn parse_size_unit(size_str: &str) -> (&str, u64) {
    const UNITS: &[(&str, u64)] = &[
        ("GIB", 1_073_741_824),
        ("MIB", 1_048_576),
        ("KIB", 1_024),
        ("GB", 1_000_000_000),
        ("MB", 1_000_000),
        ("KB", 1_000),
    ];

    for (suffix, multiplier) in UNITS {
        if size_str.ends_with(suffix) {
            return (size_str.trim_end_matches(suffix), *multiplier);
        }
    }

    (size_str, 1)
}
