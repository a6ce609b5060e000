//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.review-trends.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".review-trends.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Index page settings.
    #[serde(default)]
    pub index: IndexConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// One configured text matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatcherSpec {
    /// A literal token bounded by non-word characters.
    Token { value: String },
    /// Segments appearing in order on one line, other text allowed between.
    /// A segment may list alternatives separated by `|`.
    Phrase { parts: Vec<String> },
}

impl MatcherSpec {
    pub fn token(value: &str) -> Self {
        MatcherSpec::Token {
            value: value.to_string(),
        }
    }

    pub fn phrase(parts: &[&str]) -> Self {
        MatcherSpec::Phrase {
            parts: parts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Report scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Matchers counting decisions (turns).
    #[serde(default = "default_turn_markers")]
    pub turn_markers: Vec<MatcherSpec>,

    /// Matchers counting divergences from the recommended choice, in order.
    #[serde(default = "default_divergence")]
    pub divergence: Vec<MatcherSpec>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            turn_markers: default_turn_markers(),
            divergence: default_divergence(),
        }
    }
}

fn default_turn_markers() -> Vec<MatcherSpec> {
    vec![MatcherSpec::token("turn"), MatcherSpec::token("巡")]
}

fn default_divergence() -> Vec<MatcherSpec> {
    vec![
        MatcherSpec::token("mismatch"),
        MatcherSpec::token("difference"),
        MatcherSpec::phrase(&["ai", "best", "you"]),
        MatcherSpec::phrase(&["あなた", "誤り|ミス"]),
        MatcherSpec::phrase(&["最善", "あなた", "一致せず|不一致"]),
    ]
}

/// Index page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Page title and main heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Language of the page's fixed labels.
    #[serde(default)]
    pub language: PageLanguage,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            language: PageLanguage::default(),
        }
    }
}

/// Language of the index page's labels and `lang` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLanguage {
    #[default]
    En,
    Ja,
}

fn default_title() -> String {
    "mjai-reviewer reports".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.verbose {
            self.general.verbose = true;
        }

        if let crate::cli::Command::BuildIndex {
            title: Some(ref title),
            ..
        } = args.command
        {
            self.index.title = title.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
