//! TED scraper main entry point
//!
//! This is the command-line interface for the resumable TED notice scraper.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use ted_scraper::config::{load_config_with_hash, Config, SessionCookies};
use ted_scraper::crawler::choose_action;
use ted_scraper::output::{
    print_records_overview, print_run_summary, records_overview, TerminalPrompt,
};
use ted_scraper::state::Action;
use ted_scraper::storage::{open_storage, Storage};
use ted_scraper::Coordinator;
use tracing_subscriber::EnvFilter;

/// Number of field names listed by `--stats`
const TOP_FIELDS: usize = 20;

/// TED scraper: collects structured notice data from the EU tenders portal
///
/// Pages through the search listing, scrapes the "Data" tab of every notice
/// and keeps records and crawl position on disk so that later runs can
/// continue or update.
#[derive(Parser, Debug)]
#[command(name = "ted-scraper")]
#[command(version)]
#[command(about = "A resumable scraper for TED tender notices", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// How to resume from a previous run, instead of asking
    #[arg(long, value_enum)]
    action: Option<Action>,

    /// Validate config and show what would be used without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show an overview of the stored records and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Cookie values may live in a local .env file
    dotenvy::dotenv().ok();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;
    let cookies = SessionCookies::from_env(&config.cookies);

    if cli.dry_run {
        handle_dry_run(&config, &cookies);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &cookies, cli.action).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ted_scraper=info,warn"),
            1 => EnvFilter::new("ted_scraper=debug,info"),
            2 => EnvFilter::new("ted_scraper=trace,debug"),
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

fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, cookies: &SessionCookies) {
    println!("=== TED Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base());
    println!("  Search URL: {}", config.site.search_url());

    println!("\nCrawler:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    println!("  State: {}", config.output.state_path);

    println!("\nSession cookies ({} of {}):", cookies.len(), config.cookies.len());
    for (name, var) in &config.cookies {
        let found = cookies.names().any(|n| n == name);
        let mark = if found { "✓" } else { "✗" };
        println!("  {} {} (from ${})", mark, name, var);
    }

    println!("\n✓ Configuration is valid");
    if cookies.is_empty() {
        println!("✗ No session cookies found; the portal may refuse listing pages");
    }
}

/// Handles the --stats mode: summarizes the stored records
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(&config.output);
    println!("Records: {}", storage.records_path().display());
    println!("State: {}\n", storage.state_path().display());

    let records = storage.load_records()?;
    let state = storage.load_state()?;

    print_records_overview(&records_overview(&records, &state), TOP_FIELDS);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    cookies: &SessionCookies,
    preset: Option<Action>,
) -> anyhow::Result<()> {
    tracing::info!(
        "Using {} session cookies, {}ms between notices",
        cookies.len(),
        config.crawler.request_delay_ms
    );

    let mut coordinator = Coordinator::live(config, cookies)?;
    let action = choose_action(
        coordinator.resume_point(),
        preset,
        &mut TerminalPrompt::stdio(),
    )
    .context("Failed to read resume choice")?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match coordinator.run_until(action, shutdown).await {
        Ok(outcome) => {
            println!();
            print_run_summary(coordinator.summary(), &outcome, coordinator.records().len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
