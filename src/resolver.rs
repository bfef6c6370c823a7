//! Fuzzy resolution of free-text queries to project paths.
//!
//! The resolver is a pure, read-only function over an already-loaded index:
//! it tokenizes the query, scores every project's name (and shortcut
//! aliases) against every token with a three-tier similarity function, and
//! returns the best-scoring project above a threshold.
//!
//! The similarity tiers, in priority order:
//! 1. **exact** equality → 1.0
//! 2. **containment** — either string is a substring of the other →
//!    `len(shorter) / len(longer)`; a strong, cheap signal for
//!    abbreviations and compound names, checked before the edit distance
//! 3. **normalized edit distance** — `1 - levenshtein(a, b) / max_len`
//!
//! Resolution picks the globally best-scoring project, breaking ties by
//! index order, so a query exactly matching one project's name can never
//! lose to an earlier weaker candidate.

use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;

use crate::project::{Project, ProjectIndex};

/// Default similarity threshold (strict mode).
pub const STRICT_THRESHOLD: f64 = 0.7;

/// Looser threshold for permissive mode.
pub const PERMISSIVE_THRESHOLD: f64 = 0.5;

/// Splits a query on any run of characters that is neither a word
/// character nor a hyphen.
#[allow(clippy::unwrap_used)] // the pattern is a compile-time constant
static TOKEN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]+").unwrap());

/// Resolver tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct ResolveOptions {
    /// Minimum similarity in `[0, 1]` a token must reach against one of a
    /// project's candidate names for the project to match
    pub threshold: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            threshold: STRICT_THRESHOLD,
        }
    }
}

/// A successful resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedProject {
    /// Name of the matched project
    pub name: String,

    /// Absolute path of the matched project
    pub path: PathBuf,

    /// The winning similarity score
    pub score: f64,
}

/// A minimal name→path record, the alternate resolver input used by
/// deployments that maintain a flat external index file instead of the
/// full document.
#[derive(Clone, Debug, Deserialize)]
pub struct FlatEntry {
    /// Project name to score against query tokens
    pub name: String,

    /// Path returned when this entry wins
    pub path: PathBuf,
}

/// Resolve a free-text query against a full index.
///
/// Returns `None` when no project clears the threshold; callers branch on
/// this explicitly, an index that failed to load is a separate error path.
#[must_use]
pub fn resolve(query: &str, index: &ProjectIndex, options: ResolveOptions) -> Option<ResolvedProject> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return None;
    }

    let mut best: Option<ResolvedProject> = None;

    for project in &index.projects {
        let score = project_score(project, &tokens);
        if score < options.threshold {
            continue;
        }

        // Strict ordering keeps the earliest project on ties
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(ResolvedProject {
                name: project.name.clone(),
                path: project.path.clone(),
                score,
            });
        }
    }

    best
}

/// Resolve a query against a flat name→path list.
#[must_use]
pub fn resolve_entries(
    query: &str,
    entries: &[FlatEntry],
    options: ResolveOptions,
) -> Option<ResolvedProject> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return None;
    }

    let mut best: Option<ResolvedProject> = None;

    for entry in entries {
        let name = entry.name.to_lowercase();
        let score = tokens
            .iter()
            .map(|token| similarity(token, &name))
            .fold(0.0_f64, f64::max);

        if score >= options.threshold && best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(ResolvedProject {
                name: entry.name.clone(),
                path: entry.path.clone(),
                score,
            });
        }
    }

    best
}

/// Best score of any token against the project's name or shortcut aliases.
fn project_score(project: &Project, tokens: &[String]) -> f64 {
    let name = project.name.to_lowercase();

    let mut candidates = vec![name];
    for alias in &project.shortcuts {
        candidates.push(alias.to_lowercase());
    }

    let mut best = 0.0_f64;
    for candidate in &candidates {
        for token in tokens {
            best = best.max(similarity(token, candidate));
        }
    }
    best
}

/// Lowercase and split a query into a token bag.
///
/// Hyphenated tokens also contribute their hyphen-split parts, so
/// `"car-logbook"` yields `["car-logbook", "car", "logbook"]` and queries
/// cover compound-word variants.
#[must_use]
pub fn tokenize(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut tokens = Vec::new();

    for raw in TOKEN_SPLIT.split(&lowered) {
        if raw.is_empty() {
            continue;
        }
        tokens.push(raw.to_string());

        if raw.contains('-') {
            for part in raw.split('-').filter(|p| !p.is_empty()) {
                tokens.push(part.to_string());
            }
        }
    }

    tokens
}

/// Three-tier similarity in `[0, 1]`: exact, containment, edit distance.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }

    if a.contains(b) || b.contains(a) {
        let min_len = a_len.min(b_len);
        return min_len as f64 / max_len as f64;
    }

    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Classic single-character insert/delete/substitute edit distance,
/// computed over one rolling row.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectStatus, ProjectType};
    use std::collections::BTreeMap;
    use std::path::Path;

    fn project(name: &str, shortcuts: &[&str]) -> Project {
        Project {
            name: name.to_string(),
            path: PathBuf::from(format!("/dev/{name}")),
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

    fn index_of(projects: Vec<Project>) -> ProjectIndex {
        ProjectIndex::assemble(projects, Path::new("/dev"), &BTreeMap::new())
    }

    // ── Tokenization ────────────────────────────────────────────────────

    #[test]
    fn test_tokenize_splits_on_non_word_runs() {
        assert_eq!(
            tokenize("show taqwa main.go"),
            vec!["show", "taqwa", "main", "go"]
        );
    }

    #[test]
    fn test_tokenize_emits_hyphen_subtokens() {
        assert_eq!(
            tokenize("mycar-logbook"),
            vec!["mycar-logbook", "mycar", "logbook"]
        );
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_empties() {
        assert_eq!(tokenize("  Open TAQWA!! "), vec!["open", "taqwa"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!,.").is_empty());
    }

    // ── Levenshtein ─────────────────────────────────────────────────────

    #[test]
    fn test_levenshtein_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_levenshtein_symmetry() {
        for (a, b) in [("taqwa", "taqva"), ("car", "carlogbook"), ("x", "yz")] {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    // ── Similarity tiers ────────────────────────────────────────────────

    #[test]
    fn test_similarity_identity() {
        for s in ["", "a", "taqwa", "car-logbook"] {
            assert!((similarity(s, s) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_similarity_containment_ratio() {
        // "logbook" (7) inside "carlogbook" (10) → 0.7
        assert!((similarity("logbook", "carlogbook") - 0.7).abs() < 1e-9);
        assert!((similarity("carlogbook", "logbook") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_edit_distance_tier() {
        // "taqva" vs "taqwa": one substitution over length 5 → 0.8
        assert!((similarity("taqva", "taqwa") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_edit_distance_symmetry() {
        for (a, b) in [("taqva", "taqwa"), ("weather", "taqwa"), ("abc", "xyz")] {
            assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    // ── Resolution ──────────────────────────────────────────────────────

    #[test]
    fn test_exact_name_always_resolves() {
        let index = index_of(vec![
            project("carlogbook", &[]),
            project("taqwa", &[]),
        ]);

        let hit = resolve("open taqwa please", &index, ResolveOptions::default()).unwrap();
        assert_eq!(hit.name, "taqwa");
        assert_eq!(hit.path, PathBuf::from("/dev/taqwa"));
        assert!((hit.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hyphen_compound_matches_through_containment() {
        // "mycar-logbook" tokens include "logbook"; vs "carlogbook" → 0.7
        let index = index_of(vec![project("carlogbook", &[])]);

        let hit = resolve(
            "mycar-logbook",
            &index,
            ResolveOptions {
                threshold: STRICT_THRESHOLD,
            },
        )
        .unwrap();
        assert_eq!(hit.name, "carlogbook");
    }

    #[test]
    fn test_unrelated_query_is_no_match() {
        let index = index_of(vec![
            project("carlogbook", &[]),
            project("taqwa", &[]),
        ]);

        assert!(resolve("weather today", &index, ResolveOptions::default()).is_none());
    }

    #[test]
    fn test_best_match_beats_earlier_weaker_candidate() {
        // Both clear the permissive threshold, but the later project is the
        // better match and must win.
        let index = index_of(vec![
            project("carlog", &[]),
            project("carlogbook", &[]),
        ]);

        let hit = resolve(
            "carlogbook",
            &index,
            ResolveOptions {
                threshold: PERMISSIVE_THRESHOLD,
            },
        )
        .unwrap();
        assert_eq!(hit.name, "carlogbook");
    }

    #[test]
    fn test_tie_breaks_by_index_order() {
        let index = index_of(vec![
            project("service-a", &[]),
            project("service-b", &[]),
        ]);

        // "service" is contained in both names with identical ratios
        let hit = resolve(
            "service",
            &index,
            ResolveOptions {
                threshold: PERMISSIVE_THRESHOLD,
            },
        )
        .unwrap();
        assert_eq!(hit.name, "service-a");
    }

    #[test]
    fn test_shortcut_alias_matches() {
        let index = index_of(vec![project("carlogbook", &["logbook"])]);

        let hit = resolve("logbook", &index, ResolveOptions::default()).unwrap();
        assert_eq!(hit.name, "carlogbook");
    }

    #[test]
    fn test_permissive_threshold_admits_weaker_matches() {
        let index = index_of(vec![project("carlogbook", &[])]);

        // "book" in "carlogbook": 4/10 = 0.4, below both thresholds
        assert!(
            resolve(
                "book",
                &index,
                ResolveOptions {
                    threshold: PERMISSIVE_THRESHOLD
                }
            )
            .is_none()
        );

        // "logboo" in "carlogbook": 6/10 = 0.6, permissive only
        assert!(
            resolve(
                "logboo",
                &index,
                ResolveOptions {
                    threshold: STRICT_THRESHOLD
                }
            )
            .is_none()
        );
        assert!(
            resolve(
                "logboo",
                &index,
                ResolveOptions {
                    threshold: PERMISSIVE_THRESHOLD
                }
            )
            .is_some()
        );
    }

    #[test]
    fn test_empty_query_is_no_match() {
        let index = index_of(vec![project("taqwa", &[])]);
        assert!(resolve("", &index, ResolveOptions::default()).is_none());
        assert!(resolve("  !! ", &index, ResolveOptions::default()).is_none());
    }

    #[test]
    fn test_flat_entries_resolution() {
        let entries = vec![
            FlatEntry {
                name: "taqwa".to_string(),
                path: PathBuf::from("/dev/taqwa"),
            },
            FlatEntry {
                name: "carlogbook".to_string(),
                path: PathBuf::from("/dev/carlogbook"),
            },
        ];

        let hit = resolve_entries("show taqwa main.go", &entries, ResolveOptions::default())
            .unwrap();
        assert_eq!(hit.path, PathBuf::from("/dev/taqwa"));

        assert!(resolve_entries("weather today", &entries, ResolveOptions::default()).is_none());
    }

    #[test]
    fn test_flat_entries_deserialize() {
        let json = r#"[{"name": "taqwa", "path": "/dev/taqwa"}]"#;
        let entries: Vec<FlatEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].name, "taqwa");
    }
}
