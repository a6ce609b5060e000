//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// review-trends - monthly mismatch statistics for game review reports
///
/// Scans per-game review reports, summarises how often the recorded
/// choice diverged from the recommended one, and builds a static index
/// page over all months.
///
/// Examples:
///   review-trends aggregate --in site/202501 --out site/202501/summary.json
///   review-trends build-index --root site
///   review-trends init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .review-trends.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true, env = "REVIEW_TRENDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan every game report in a month directory and write its summary
    Aggregate {
        /// Month directory holding one subdirectory per game
        #[arg(long = "in", value_name = "MONTH_DIR")]
        input: PathBuf,

        /// Output file for the JSON summary
        #[arg(long = "out", value_name = "FILE")]
        output: PathBuf,
    },

    /// Render ROOT/index.html from all month directories under ROOT
    BuildIndex {
        /// Directory holding one numeric subdirectory per month
        #[arg(long, value_name = "DIR")]
        root: PathBuf,

        /// Page title (overrides the config file)
        #[arg(long)]
        title: Option<String>,
    },

    /// Generate a default .review-trends.toml configuration file
    InitConfig,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::BuildIndex {
            title: Some(ref title),
            ..
        } = self.command
        {
            if title.trim().is_empty() {
                return Err("Title must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            config: None,
            verbose: false,
            quiet: false,
            command: Command::BuildIndex {
                root: PathBuf::from("site"),
                title: None,
            },
        }
    }

    #[test]
    fn test_parse_aggregate() {
        let args = Args::try_parse_from([
            "review-trends",
            "aggregate",
            "--in",
            "site/202501",
            "--out",
            "site/202501/summary.json",
        ])
        .unwrap();

        match args.command {
            Command::Aggregate { input, output } => {
                assert_eq!(input, PathBuf::from("site/202501"));
                assert_eq!(output, PathBuf::from("site/202501/summary.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_path_is_rejected() {
        assert!(Args::try_parse_from(["review-trends", "aggregate", "--in", "x"]).is_err());
        assert!(Args::try_parse_from(["review-trends", "build-index"]).is_err());
        assert!(Args::try_parse_from(["review-trends"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["review-trends", "build-index", "--root", "site", "-v"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_config_path_from_environment() {
        std::env::set_var("REVIEW_TRENDS_CONFIG", "club.toml");
        let from_env = Args::try_parse_from(["review-trends", "init-config"]).unwrap();
        let from_flag =
            Args::try_parse_from(["review-trends", "init-config", "-c", "other.toml"]).unwrap();
        std::env::remove_var("REVIEW_TRENDS_CONFIG");

        assert_eq!(from_env.config, Some(PathBuf::from("club.toml")));
        assert_eq!(from_flag.config, Some(PathBuf::from("other.toml")));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_title() {
        let mut args = make_args();
        args.command = Command::BuildIndex {
            root: PathBuf::from("site"),
            title: Some("  ".to_string()),
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
