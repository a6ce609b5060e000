//! Report scanner for estimating decisions and mismatches.
//!
//! This module turns one review report into decision counts using a
//! configurable set of text matchers. It is a heuristic, not a parser:
//! malformed documents never fail, they just count nothing.

pub mod matcher;
pub mod text;

use crate::config::ScannerConfig;
use crate::error::TrendsError;
use crate::models::ReviewStats;
use matcher::MatcherSet;

/// Extracts decision statistics from a raw report document.
pub trait DecisionExtractor {
    fn extract(&self, document: &[u8]) -> ReviewStats;
}

/// Scanner counting turn markers and divergence phrases.
pub struct ReportScanner {
    turn_markers: MatcherSet,
    divergence: MatcherSet,
}

impl ReportScanner {
    /// Build a scanner, compiling every configured matcher.
    pub fn new(config: &ScannerConfig) -> Result<Self, TrendsError> {
        Ok(Self {
            turn_markers: MatcherSet::from_specs(&config.turn_markers)?,
            divergence: MatcherSet::from_specs(&config.divergence)?,
        })
    }

    /// Scan a raw document.
    pub fn scan_document(&self, document: &[u8]) -> ReviewStats {
        let html = text::decode_lossy(document);
        let flat = text::flatten_markup(&html);
        self.scan_text(&flat)
    }

    /// Scan text that has already been flattened and lowercased.
    pub fn scan_text(&self, flat: &str) -> ReviewStats {
        let decisions = self.turn_markers.count(flat);
        let mismatches = self.divergence.count(flat);
        ReviewStats::from_counts(decisions, mismatches)
    }
}

impl TryFrom<&ScannerConfig> for ReportScanner {
    type Error = TrendsError;

    fn try_from(config: &ScannerConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl DecisionExtractor for ReportScanner {
    fn extract(&self, document: &[u8]) -> ReviewStats {
        self.scan_document(document)
    }
}
