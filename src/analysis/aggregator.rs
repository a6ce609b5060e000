//! Monthly aggregation of per-game review statistics.
//!
//! This module discovers the game reports inside a month directory, scans
//! each one, and persists the resulting [`MonthSummary`] as JSON.

use crate::error::TrendsError;
use crate::models::{GameStats, MonthSummary};
use crate::scanner::DecisionExtractor;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Entry-point file of a per-game report.
pub const REPORT_FILE_NAME: &str = "index.html";

/// Summary file written inside each month directory.
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// A discovered per-game report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// Name of the directory holding the report.
    pub game_id: String,
    /// Path to the report's entry-point file.
    pub path: PathBuf,
}

/// Find every game report below a month directory.
///
/// Reports are `index.html` files at least one directory deep; the game id is
/// the name of the directory containing the file. The first report found for
/// an id wins.
pub fn discover_reports(month_dir: &Path) -> Result<Vec<GameReport>, TrendsError> {
    fs::read_dir(month_dir).map_err(|e| TrendsError::unreadable(month_dir, e))?;

    let mut reports = Vec::new();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(month_dir).min_depth(2).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_name() != REPORT_FILE_NAME || !entry.path().is_file() {
            continue;
        }

        let Some(game_id) = entry
            .path()
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };

        if !seen.insert(game_id.clone()) {
            warn!(
                "Duplicate game id {}, ignoring {}",
                game_id,
                entry.path().display()
            );
            continue;
        }

        reports.push(GameReport {
            game_id,
            path: entry.into_path(),
        });
    }

    Ok(reports)
}

/// Scan one report. Unreadable files count as empty documents.
pub fn scan_report<E: DecisionExtractor + ?Sized>(report: &GameReport, extractor: &E) -> GameStats {
    let document = match fs::read(&report.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Cannot read {}: {}", report.path.display(), e);
            Vec::new()
        }
    };

    GameStats::new(report.game_id.clone(), extractor.extract(&document))
}

/// Aggregate every game report in a month directory.
pub fn aggregate_month<E: DecisionExtractor + ?Sized>(
    month_dir: &Path,
    extractor: &E,
    show_progress: bool,
) -> Result<MonthSummary, TrendsError> {
    let reports = discover_reports(month_dir)?;
    info!(
        "Found {} game reports in {}",
        reports.len(),
        month_dir.display()
    );

    let pb = if show_progress && !reports.is_empty() {
        let pb = ProgressBar::new(reports.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut by_game = Vec::with_capacity(reports.len());
    for report in &reports {
        pb.set_message(report.game_id.clone());
        let stats = scan_report(report, extractor);
        debug!(
            "{}: {} decisions, {} mismatches",
            stats.game_id, stats.total_decisions, stats.mismatches
        );
        by_game.push(stats);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(MonthSummary::from_games(month_name(month_dir), by_game))
}

/// Name of the month, taken from the directory's last path component.
pub fn month_name(month_dir: &Path) -> String {
    let name = month_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    name.or_else(|| {
        fs::canonicalize(month_dir)
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    })
    .unwrap_or_default()
}

/// Write a summary as pretty-printed JSON.
pub fn write_summary(summary: &MonthSummary, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(summary).context("Failed to serialize month summary")?;

    fs::write(path, content).map_err(|e| TrendsError::unwritable(path, e))?;
    Ok(())
}

/// Read a persisted summary.
pub fn load_summary(path: &Path) -> Result<MonthSummary> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read summary: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse summary: {}", path.display()))
}
