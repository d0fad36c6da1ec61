//! Dated snapshot folders.
//!
//! Source and destination roots hold subfolders named `YYYY-MM-DD <label>`.
//! The date prefix defines recency: the newest source folder is what gets
//! backed up, the oldest destination folder is the eviction candidate.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\s.*$").expect("valid snapshot name pattern"));

/// A dated folder found directly under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Parse the leading ISO date from a folder name matching the convention.
///
/// Names that match the pattern but carry an impossible date (month 13,
/// day 40) are treated as non-matching.
pub fn parse_date(name: &str) -> Option<NaiveDate> {
    if !NAME_PATTERN.is_match(name) {
        return None;
    }
    let prefix = name.split_whitespace().next()?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// List dated folders directly under `root`, oldest first.
///
/// Non-matching names are ignored. Same-date folders order by full name.
pub fn list(root: &Path) -> Result<Vec<Snapshot>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("Could not read {}", root.display()))?;

    let mut snapshots = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().context("Failed to read file type")?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(date) = parse_date(&name) {
            snapshots.push(Snapshot {
                name,
                date,
                path: entry.path(),
            });
        }
    }

    snapshots.sort_by(|a, b| (a.date, a.name.as_str()).cmp(&(b.date, b.name.as_str())));
    Ok(snapshots)
}

/// Most recently dated folder under `root`
pub fn most_recent(root: &Path) -> Result<Option<Snapshot>> {
    Ok(list(root)?.pop())
}

/// Oldest dated folder under `root`
pub fn oldest(root: &Path) -> Result<Option<Snapshot>> {
    Ok(list(root)?.into_iter().next())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir(root.join(name)).unwrap();
        }
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date("2024-05-01 Session"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn test_parse_date_rejects_undated_names() {
        assert_eq!(parse_date("invalid-name"), None);
        assert_eq!(parse_date("2024-05-01"), None); // no label after the date
        assert_eq!(parse_date("05-01-2024 Session"), None);
    }

    #[test]
    fn test_parse_date_rejects_impossible_date() {
        assert_eq!(parse_date("2024-13-40 Session"), None);
    }

    #[test]
    fn test_list_orders_by_date() {
        let tmp = TempDir::new().unwrap();
        mkdirs(tmp.path(), &["2023-01-01 A", "2023-06-01 B", "2022-12-31 C"]);

        let snapshots = list(tmp.path()).unwrap();
        let names: Vec<&str> = snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["2022-12-31 C", "2023-01-01 A", "2023-06-01 B"]);
    }

    #[test]
    fn test_list_ignores_undated_folders_and_files() {
        let tmp = TempDir::new().unwrap();
        mkdirs(tmp.path(), &["2023-01-01 A", "invalid-name"]);
        fs::write(tmp.path().join("2023-02-02 file-not-dir"), "x").unwrap();

        let snapshots = list(tmp.path()).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "2023-01-01 A");
    }

    #[test]
    fn test_same_date_ties_break_lexicographically() {
        let tmp = TempDir::new().unwrap();
        mkdirs(tmp.path(), &["2023-01-01 Beta", "2023-01-01 Alpha"]);

        let snapshots = list(tmp.path()).unwrap();
        assert_eq!(snapshots[0].name, "2023-01-01 Alpha");
        assert_eq!(snapshots[1].name, "2023-01-01 Beta");
    }

    #[test]
    fn test_most_recent_and_oldest() {
        let tmp = TempDir::new().unwrap();
        mkdirs(tmp.path(), &["2023-01-01 A", "2023-06-01 B", "2022-12-31 C"]);

        assert_eq!(most_recent(tmp.path()).unwrap().unwrap().name, "2023-06-01 B");
        assert_eq!(oldest(tmp.path()).unwrap().unwrap().name, "2022-12-31 C");
    }

    #[test]
    fn test_empty_root() {
        let tmp = TempDir::new().unwrap();
        assert!(most_recent(tmp.path()).unwrap().is_none());
        assert!(oldest(tmp.path()).unwrap().is_none());
    }
}
