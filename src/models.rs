//! Data models for review statistics.
//!
//! This module contains the per-game and per-month statistics that flow
//! from the scanner through the aggregator into the index page.

use serde::{Deserialize, Serialize};

/// Decision counts extracted from a single report, before it is tied to a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Detected decisions, never below 1.
    pub total_decisions: u64,
    /// Detected divergences, never above `total_decisions`.
    pub mismatches: u64,
    /// `mismatches / total_decisions`.
    pub mismatch_rate: f64,
}

impl ReviewStats {
    /// Builds stats from raw counts, applying the floor and clamp rules.
    pub fn from_counts(decisions: u64, mismatches: u64) -> Self {
        let total_decisions = decisions.max(1);
        let mismatches = mismatches.min(total_decisions);

        Self {
            total_decisions,
            mismatches,
            mismatch_rate: mismatches as f64 / total_decisions as f64,
        }
    }
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self::from_counts(0, 0)
    }
}

/// Statistics for one reviewed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Name of the game's report directory.
    pub game_id: String,
    pub total_decisions: u64,
    pub mismatches: u64,
    pub mismatch_rate: f64,
}

impl GameStats {
    /// Ties scanned stats to a game id.
    pub fn new(game_id: impl Into<String>, stats: ReviewStats) -> Self {
        Self {
            game_id: game_id.into(),
            total_decisions: stats.total_decisions,
            mismatches: stats.mismatches,
            mismatch_rate: stats.mismatch_rate,
        }
    }
}

/// Additive totals over a set of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionTotals {
    pub games: usize,
    pub total_decisions: u64,
    pub mismatches: u64,
}

impl DecisionTotals {
    /// Totals for a single game.
    pub fn of_game(game: &GameStats) -> Self {
        Self {
            games: 1,
            total_decisions: game.total_decisions,
            mismatches: game.mismatches,
        }
    }

    /// Sums a set of games.
    pub fn from_games<'a>(games: impl IntoIterator<Item = &'a GameStats>) -> Self {
        games.into_iter().fold(Self::default(), |mut totals, game| {
            totals.merge(Self::of_game(game));
            totals
        })
    }

    /// Combines totals from a disjoint set of games.
    pub fn merge(&mut self, other: DecisionTotals) {
        self.games += other.games;
        self.total_decisions += other.total_decisions;
        self.mismatches += other.mismatches;
    }

    /// Mismatch rate, or 0.0 when no decisions were counted.
    pub fn mismatch_rate(&self) -> f64 {
        if self.total_decisions > 0 {
            self.mismatches as f64 / self.total_decisions as f64
        } else {
            0.0
        }
    }
}

/// Aggregated statistics for one month, persisted as `summary.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthSummary {
    /// Month directory name, e.g. `202501`.
    pub month: String,
    /// Number of games contributing.
    pub games: usize,
    pub total_decisions: u64,
    pub mismatches: u64,
    pub mismatch_rate: f64,
    /// Per-game statistics, ordered by game id.
    pub by_game: Vec<GameStats>,
}

impl MonthSummary {
    /// Creates a summary from per-game stats. Games are sorted by id.
    pub fn from_games(month: impl Into<String>, mut by_game: Vec<GameStats>) -> Self {
        by_game.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        let totals = DecisionTotals::from_games(&by_game);

        Self {
            month: month.into(),
            games: totals.games,
            total_decisions: totals.total_decisions,
            mismatches: totals.mismatches,
            mismatch_rate: totals.mismatch_rate(),
            by_game,
        }
    }

    /// Looks up a game's recorded stats by id.
    pub fn game(&self, game_id: &str) -> Option<&GameStats> {
        self.by_game.iter().find(|g| g.game_id == game_id)
    }
}

/// One row of a month's game table on the index page.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub id: String,
    pub total: u64,
    pub mism: u64,
    pub rate: f64,
}

impl GameRow {
    /// A game found on disk with no recorded stats.
    pub fn unscored(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            total: 0,
            mism: 0,
            rate: 0.0,
        }
    }

    /// Copies recorded stats over the zero defaults.
    pub fn overlay(&mut self, stats: &GameStats) {
        self.total = stats.total_decisions;
        self.mism = stats.mismatches;
        self.rate = stats.mismatch_rate;
    }
}

/// Everything the index page shows for one month directory.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub month_name: String,
    pub summary: Option<MonthSummary>,
    pub games: Vec<GameRow>,
}
