//! Index collection over a tree of month directories.
//!
//! Layout: `root/<month>/summary.json` (optional) and
//! `root/<month>/<game>/index.html`, with month names made of digits.

use crate::analysis::{load_summary, REPORT_FILE_NAME, SUMMARY_FILE_NAME};
use crate::config::IndexConfig;
use crate::error::TrendsError;
use crate::models::{GameRow, IndexEntry};
use crate::report::generator::generate_index_html;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the rendered index, written at the root.
pub const INDEX_FILE_NAME: &str = "index.html";

/// Whether a directory name identifies a month.
pub fn is_month_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// Immediate subdirectories of `dir`, sorted by name.
fn list_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, TrendsError> {
    let entries = fs::read_dir(dir).map_err(|e| TrendsError::unreadable(dir, e))?;

    let mut dirs: Vec<(String, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((name, path))
        })
        .collect();

    dirs.sort();
    Ok(dirs)
}

/// Build the index entry for one month directory.
pub fn month_entry(name: &str, month_dir: &Path) -> Result<IndexEntry, TrendsError> {
    let summary_path = month_dir.join(SUMMARY_FILE_NAME);
    let summary = if summary_path.is_file() {
        match load_summary(&summary_path) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Ignoring summary for {}: {:#}", name, e);
                None
            }
        }
    } else {
        debug!("No summary for {}", name);
        None
    };

    let mut games: Vec<GameRow> = list_subdirs(month_dir)?
        .into_iter()
        .filter(|(_, path)| path.join(REPORT_FILE_NAME).is_file())
        .map(|(id, _)| GameRow::unscored(id))
        .collect();

    if let Some(ref summary) = summary {
        for row in &mut games {
            if let Some(stats) = summary.game(&row.id) {
                row.overlay(stats);
            }
        }
    }

    Ok(IndexEntry {
        month_name: name.to_string(),
        summary,
        games,
    })
}

/// Collect entries for every month directory under `root`, ascending by name.
pub fn collect_entries(root: &Path) -> Result<Vec<IndexEntry>, TrendsError> {
    list_subdirs(root)?
        .into_iter()
        .filter(|(name, _)| is_month_name(name))
        .map(|(name, path)| month_entry(&name, &path))
        .collect()
}

/// Render and write `root/index.html`. Returns the written path.
pub fn build_index(root: &Path, config: &IndexConfig) -> Result<PathBuf> {
    let entries = collect_entries(root)?;
    let games: usize = entries.iter().map(|e| e.games.len()).sum();
    info!("Indexing {} months, {} games", entries.len(), games);

    let html = generate_index_html(&entries, config);
    let path = root.join(INDEX_FILE_NAME);
    fs::write(&path, html).map_err(|e| TrendsError::unwritable(&path, e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::write_summary;
    use crate::models::{GameStats, MonthSummary, ReviewStats};
    use tempfile::TempDir;

    fn write_game(month: &Path, game: &str) {
        let dir = month.join(game);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(REPORT_FILE_NAME), "<p>report</p>").unwrap();
    }

    fn game(id: &str, total: u64, mism: u64) -> GameStats {
        GameStats::new(id, ReviewStats::from_counts(total, mism))
    }

    #[test]
    fn test_is_month_name() {
        assert!(is_month_name("202501"));
        assert!(is_month_name("7"));
        assert!(!is_month_name(""));
        assert!(!is_month_name("2025-01"));
        assert!(!is_month_name("assets"));
    }

    #[test]
    fn test_collect_entries_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("202502")).unwrap();
        fs::create_dir_all(root.join("202501")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("202503"), "a file, not a month").unwrap();

        let entries = collect_entries(root).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.month_name.as_str()).collect();
        assert_eq!(names, vec!["202501", "202502"]);
        assert!(entries.iter().all(|e| e.summary.is_none() && e.games.is_empty()));
    }

    #[test]
    fn test_games_overlaid_from_summary() {
        let temp = TempDir::new().unwrap();
        let month = temp.path().join("202501");
        write_game(&month, "g1");
        write_game(&month, "g2");
        fs::create_dir_all(month.join("no-report")).unwrap();

        let summary = MonthSummary::from_games("202501", vec![game("g1", 10, 3)]);
        write_summary(&summary, &month.join(SUMMARY_FILE_NAME)).unwrap();

        let entry = month_entry("202501", &month).unwrap();
        assert_eq!(entry.summary.as_ref(), Some(&summary));
        assert_eq!(entry.games.len(), 2);

        let g1 = &entry.games[0];
        assert_eq!((g1.id.as_str(), g1.total, g1.mism), ("g1", 10, 3));
        assert!((g1.rate - 0.3).abs() < 1e-9);

        // Present on disk but absent from the summary.
        assert_eq!(entry.games[1], GameRow::unscored("g2"));
    }

    #[test]
    fn test_summary_games_missing_on_disk_are_not_listed() {
        let temp = TempDir::new().unwrap();
        let month = temp.path().join("202501");
        write_game(&month, "g1");

        let summary =
            MonthSummary::from_games("202501", vec![game("g1", 4, 1), game("gone", 9, 9)]);
        write_summary(&summary, &month.join(SUMMARY_FILE_NAME)).unwrap();

        let entry = month_entry("202501", &month).unwrap();
        let ids: Vec<_> = entry.games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g1"]);
    }

    #[test]
    fn test_corrupt_summary_is_ignored() {
        let temp = TempDir::new().unwrap();
        let month = temp.path().join("202501");
        write_game(&month, "g1");
        fs::write(month.join(SUMMARY_FILE_NAME), "{ not json").unwrap();

        let entry = month_entry("202501", &month).unwrap();
        assert!(entry.summary.is_none());
        assert_eq!(entry.games, vec![GameRow::unscored("g1")]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = collect_entries(&temp.path().join("missing"));
        assert!(matches!(
            result,
            Err(TrendsError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_build_index_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let month = root.join("202501");
        write_game(&month, "g1");
        write_game(&month, "g2");
        let summary = MonthSummary::from_games("202501", vec![game("g1", 8, 2)]);
        write_summary(&summary, &month.join(SUMMARY_FILE_NAME)).unwrap();
        fs::create_dir_all(root.join("202502")).unwrap();

        let config = IndexConfig::default();
        let path = build_index(root, &config).unwrap();
        assert_eq!(path, root.join(INDEX_FILE_NAME));
        let first = fs::read_to_string(&path).unwrap();

        build_index(root, &config).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.contains("202501/g1/index.html"));
        assert!(first.contains("202501/g2/index.html"));
        assert!(first.contains("25.0%"));
        assert!(first.contains("<h2>202502"));
    }
}
