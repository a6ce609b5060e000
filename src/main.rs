//! review-trends - monthly mismatch statistics for game review reports
//!
//! A CLI tool that scans per-game review reports, aggregates how often
//! the recorded choice diverged from the recommended one, and renders a
//! static index page over all months.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Fatal error (unreadable directory, unwritable output, bad config)
//!   2 - Invalid command line (reported by clap)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::{Args, Command};
use config::{Config, CONFIG_FILE_NAME};
use models::MonthSummary;
use report::generator::format_percent;
use scanner::ReportScanner;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    // Load configuration before logging so the config file can raise verbosity
    let (mut config, source, ignored) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    if let Some(reason) = ignored {
        warn!("Failed to load {}, using defaults: {}", CONFIG_FILE_NAME, reason);
        if args.quiet {
            eprintln!("⚠️  {} ignored: {}", CONFIG_FILE_NAME, reason);
        }
    }

    info!("review-trends v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", source);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .review-trends.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the scanner patterns and page title.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` overrides them.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
///
/// Also returns where it came from and, when a default-location file was
/// ignored, why.
fn load_config(args: &Args) -> Result<(Config, String, Option<String>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, format!("loaded from {}", config_path.display()), None));
    }

    // Try default location
    Ok(from_default_location(Config::load_default()))
}

/// A broken file in the default location falls back to defaults.
fn from_default_location(loaded: Result<Option<Config>>) -> (Config, String, Option<String>) {
    match loaded {
        Ok(Some(config)) => (config, format!("loaded from {}", CONFIG_FILE_NAME), None),
        Ok(None) => (Config::default(), "defaults".to_string(), None),
        Err(e) => (Config::default(), "defaults".to_string(), Some(format!("{:#}", e))),
    }
}

/// Dispatch the selected command.
fn run(args: &Args, config: &Config) -> Result<()> {
    match args.command {
        Command::Aggregate {
            ref input,
            ref output,
        } => run_aggregate(input, output, config, args.quiet),
        Command::BuildIndex { ref root, .. } => run_build_index(root, config, args.quiet),
        Command::InitConfig => handle_init_config(),
    }
}

/// Scan a month directory and write its summary.
fn run_aggregate(input: &Path, output: &Path, config: &Config, quiet: bool) -> Result<()> {
    let scanner = ReportScanner::new(&config.scanner).context("Invalid scanner configuration")?;

    if !quiet {
        println!("🔍 Scanning reports in {}", input.display());
    }
    let summary = analysis::aggregate_month(input, &scanner, !quiet)?;

    analysis::write_summary(&summary, output)?;
    info!("Summary written to {}", output.display());

    if !quiet {
        print_month_summary(&summary);
        println!("\n✅ Summary saved to: {}", output.display());
    }
    Ok(())
}

/// Render the index page for a root directory.
fn run_build_index(root: &Path, config: &Config, quiet: bool) -> Result<()> {
    let path = report::build_index(root, &config.index)?;

    if !quiet {
        println!("✅ Index saved to: {}", path.display());
    }
    Ok(())
}

fn print_month_summary(summary: &MonthSummary) {
    println!("\n📊 Month {}:", summary.month);
    println!("   Games: {}", summary.games);
    println!("   Decisions: {}", summary.total_decisions);
    println!("   Mismatches: {}", summary.mismatches);
    println!(
        "   Mismatch rate: {}",
        format_percent(summary.mismatch_rate)
    );
}
