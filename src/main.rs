//! Release-Radar main entry point
//!
//! This is the command-line interface for the Release-Radar new-release scanner.

use clap::Parser;
use release_radar::config::{load_config_with_hash, Config, ReportFormat};
use release_radar::crawler::{scan, SearchWindow};
use release_radar::output::{print_statistics, renderer_for, report_path, write_report, Report};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Release-Radar: find new metal releases in your favorite genres
///
/// Release-Radar searches the Metal Archives catalog for albums released in
/// the last few days, looks up each album's exact release date, and writes
/// the results to an HTML or markdown report.
#[derive(Parser, Debug)]
#[command(name = "release-radar")]
#[command(version = "1.0.0")]
#[command(about = "Find recent album releases by genre", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search this genre instead of the configured ones (repeatable)
    #[arg(long = "genre", value_name = "GENRE")]
    genres: Vec<String>,

    /// Override how many days back to search
    #[arg(long, value_name = "DAYS")]
    days_back: Option<u32>,

    /// Override the report path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Override the report format
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Validate config and show what would be searched without touching the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else {
        Ok(handle_scan(&config, config_hash, cli.quiet).await?)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("release_radar=info,warn"),
            1 => EnvFilter::new("release_radar=debug,info"),
            2 => EnvFilter::new("release_radar=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.genres.is_empty() {
        config.search.genres = cli.genres.clone();
    }
    if let Some(days_back) = cli.days_back {
        config.search.days_back = days_back;
    }
    if let Some(output) = &cli.output {
        config.output.report_path = output.display().to_string();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
}

/// Handles the --dry-run mode: shows what would be searched
fn handle_dry_run(config: &Config) {
    println!("=== Release-Radar Dry Run ===\n");

    let window = SearchWindow::ending_today(config.search.days_back);

    println!("Search:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  Genres: {}", config.search.genres.join(", "));
    println!("  Window: {} ({} days)", window, config.search.days_back);
    println!("  Query timeout: {}s", config.search.query_timeout);

    println!("\nEnrichment:");
    println!("  Concurrency: {}", config.enrichment.concurrency);
    println!("  Request timeout: {}s", config.enrichment.request_timeout);
    println!("  Total budget: {}s", config.enrichment.total_budget);
    println!(
        "  Max rate-limit hits: {}",
        config.enrichment.max_rate_limit_hits
    );
    println!(
        "  Jitter: {}-{}ms",
        config.enrichment.jitter_min_ms, config.enrichment.jitter_max_ms
    );

    println!("\nUser Agent: {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);
    println!("  Format: {:?}", config.output.format);

    println!("\n✓ Configuration is valid");
}

/// Handles the main scan operation
async fn handle_scan(
    config: &Config,
    config_hash: String,
    quiet: bool,
) -> release_radar::Result<()> {
    if config.search.genres.is_empty() {
        tracing::warn!("No genres configured; the search will not be filtered by genre");
    }

    println!(
        "Checking for releases in genres: {:?} from last {} days...\n",
        config.search.genres, config.search.days_back
    );

    let result = match scan(config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            return Err(e);
        }
    };

    let stats = result.enrichment.stats;
    if !quiet {
        print_statistics(&stats);
        println!();
    }

    let mut report = Report::new(config.output.title.clone(), result.enrichment.records);
    if report.is_empty() {
        println!("No new releases found.");
        return Ok(());
    }

    report.genres = config.search.genres.clone();
    report.window = result.window.to_string();
    report.config_hash = Some(config_hash);
    report.stats = stats;

    let renderer = renderer_for(config.output.format);
    let path = report_path(Path::new(&config.output.report_path), renderer.as_ref());
    write_report(&report, renderer.as_ref(), &path)?;

    println!("Report generated: {}", path.display());

    Ok(())
}
