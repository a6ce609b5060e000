//! Text matchers used to count decisions and divergences.
//!
//! Each matcher is independent: counts from different matchers are summed
//! even when their matches overlap.

use crate::config::MatcherSpec;
use crate::error::TrendsError;
use regex::Regex;

/// Counts occurrences of one pattern in flattened report text.
pub trait Matcher {
    /// Human-readable description, used in logs.
    fn name(&self) -> &str;

    /// Number of non-overlapping matches in `text`.
    fn count(&self, text: &str) -> usize;
}

/// A literal token with word boundaries on both sides.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    name: String,
    regex: Regex,
}

impl TokenMatcher {
    pub fn new(token: &str) -> Result<Self, TrendsError> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return Err(invalid(&token, "token is empty"));
        }

        let pattern = format!(r"\b{}\b", regex::escape(&token));
        Ok(Self {
            regex: compile(&token, &pattern)?,
            name: token,
        })
    }
}

impl Matcher for TokenMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// Segments in order on one line, with at least one character between them.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    name: String,
    regex: Regex,
}

impl PhraseMatcher {
    pub fn new<S: AsRef<str>>(parts: &[S]) -> Result<Self, TrendsError> {
        let name = parts
            .iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" … ");

        if parts.is_empty() {
            return Err(invalid(&name, "phrase has no parts"));
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let alternatives: Vec<String> = part
                .as_ref()
                .split('|')
                .map(|alt| alt.trim().to_lowercase())
                .collect();
            if alternatives.iter().any(|alt| alt.is_empty()) {
                return Err(invalid(&name, "phrase part is empty"));
            }

            let escaped: Vec<String> = alternatives.iter().map(|a| regex::escape(a)).collect();
            segments.push(format!("(?:{})", escaped.join("|")));
        }

        // `.` stops at newlines, so a phrase never spans two text runs.
        let pattern = segments.join(".+");
        Ok(Self {
            regex: compile(&name, &pattern)?,
            name,
        })
    }
}

impl Matcher for PhraseMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// Build a matcher from its configuration.
pub fn build_matcher(spec: &MatcherSpec) -> Result<Box<dyn Matcher>, TrendsError> {
    Ok(match spec {
        MatcherSpec::Token { value } => Box::new(TokenMatcher::new(value)?),
        MatcherSpec::Phrase { parts } => Box::new(PhraseMatcher::new(parts)?),
    })
}

/// An ordered list of matchers whose counts are summed.
pub struct MatcherSet {
    matchers: Vec<Box<dyn Matcher>>,
}

impl MatcherSet {
    pub fn from_specs(specs: &[MatcherSpec]) -> Result<Self, TrendsError> {
        let matchers = specs
            .iter()
            .map(build_matcher)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// Sum of every matcher's count.
    pub fn count(&self, text: &str) -> u64 {
        self.matchers
            .iter()
            .map(|m| {
                let n = m.count(text);
                if n > 0 {
                    tracing::trace!("{}: {}", m.name(), n);
                }
                n as u64
            })
            .sum()
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex, TrendsError> {
    Regex::new(pattern).map_err(|e| invalid(name, &e.to_string()))
}

fn invalid(name: &str, reason: &str) -> TrendsError {
    TrendsError::InvalidMatcher {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_respects_word_boundaries() {
        let m = TokenMatcher::new("turn").unwrap();
        assert_eq!(m.count("turn 1\nturn 2"), 2);
        assert_eq!(m.count("turnover returns"), 0);
        assert_eq!(m.count("(turn)"), 1);
    }

    #[test]
    fn test_token_is_case_folded() {
        let m = TokenMatcher::new("Mismatch").unwrap();
        assert_eq!(m.name(), "mismatch");
        assert_eq!(m.count("mismatch found"), 1);
    }

    #[test]
    fn test_cjk_token_needs_non_word_neighbours() {
        let m = TokenMatcher::new("巡").unwrap();
        assert_eq!(m.count("巡\n東1局 巡 3"), 2);
        assert_eq!(m.count("1巡目"), 0);
    }

    #[test]
    fn test_token_escapes_metacharacters() {
        let m = TokenMatcher::new("a.b").unwrap();
        assert_eq!(m.count("a.b axb"), 1);
    }

    #[test]
    fn test_phrase_tolerates_intervening_words() {
        let m = PhraseMatcher::new(&["ai", "best", "you"]).unwrap();
        assert_eq!(m.count("the ai says the best move is not what you chose"), 1);
        assert_eq!(m.count("ai best\nyou"), 0);
        assert_eq!(m.count("aibestyou"), 0);
    }

    #[test]
    fn test_phrase_alternatives() {
        let m = PhraseMatcher::new(&["あなた", "誤り|ミス"]).unwrap();
        assert_eq!(m.count("あなたの打牌は誤りです"), 1);
        assert_eq!(m.count("あなたの選択はミス"), 1);
        assert_eq!(m.count("あなたの選択は正解"), 0);
    }

    #[test]
    fn test_invalid_specs_rejected() {
        assert!(TokenMatcher::new("  ").is_err());
        assert!(PhraseMatcher::new::<&str>(&[]).is_err());
        assert!(PhraseMatcher::new(&["a", "b|"]).is_err());
    }

    #[test]
    fn test_set_sums_overlapping_matchers() {
        let set = MatcherSet::from_specs(&[
            MatcherSpec::token("mismatch"),
            MatcherSpec::phrase(&["found", "mismatch"]),
        ])
        .unwrap();

        assert_eq!(set.count("found a mismatch"), 2);
    }
}
