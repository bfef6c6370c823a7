//! Best-effort git reflog parsing.
//!
//! The classifier only needs the timestamp of the most recent commit, which
//! the reflog at `.git/logs/HEAD` records on every ref update. Reading it
//! directly avoids both spawning `git` and pulling in a full version-control
//! client; the helper is deliberately narrow so it could be swapped for one
//! later without touching classification logic.
//!
//! Any read or parse failure yields `None` — a project without usable git
//! metadata is reported with an unknown status, never a failed scan.

use std::path::Path;

use chrono::{DateTime, Utc};

/// Read the tip commit timestamp from a project's reflog.
///
/// Reflog lines have the form:
///
/// ```text
/// <old-sha> <new-sha> <name> <email> <epoch-seconds> <tz>\t<message>
/// ```
///
/// The last line corresponds to the most recent ref update; its epoch field
/// is taken as the last-commit time.
#[must_use]
pub fn read_last_commit(project_dir: &Path) -> Option<DateTime<Utc>> {
    let head_log = project_dir.join(".git").join("logs").join("HEAD");
    let content = std::fs::read_to_string(head_log).ok()?;

    let last_line = content.lines().rev().find(|line| !line.trim().is_empty())?;
    parse_reflog_epoch(last_line)
}

/// Extract the epoch timestamp from a single reflog line.
fn parse_reflog_epoch(line: &str) -> Option<DateTime<Utc>> {
    // The epoch sits two whitespace-separated fields before the tab,
    // right after the closing `>` of the committer email.
    let head = line.split('\t').next()?;
    let after_email = head.rsplit_once('>')?.1;
    let epoch: i64 = after_email.split_whitespace().next()?.parse().ok()?;

    DateTime::from_timestamp(epoch, 0)
}
