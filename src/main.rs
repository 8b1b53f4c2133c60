//! scp-catalog main entry point
//!
//! This is the command-line interface for building and querying the catalog.

use anyhow::Context;
use clap::{Parser, Subcommand};
use scp_catalog::config::{load_config_with_hash, validate, Config};
use scp_catalog::output::{format_summary, print_statistics, ConsoleReporter};
use scp_catalog::CatalogService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// scp-catalog: a queryable catalog of SCP wiki entries
///
/// Crawls the wiki's series index pages, keeps every entry in a catalog
/// indexed by code and title, and saves it as a JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "scp-catalog")]
#[command(version)]
#[command(about = "Builds and queries a catalog of SCP wiki entries", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the wiki and save the catalog
    Crawl {
        /// Load the existing snapshot first so known codes are skipped
        #[arg(long)]
        resume: bool,

        /// Do not write the snapshot after crawling
        #[arg(long)]
        no_dump: bool,
    },

    /// Look entries up in the saved catalog
    Query {
        /// Code or bare number (e.g. "173", "SCP-173")
        text: String,

        /// Match titles instead of codes
        #[arg(long)]
        title: bool,
    },

    /// Show statistics for the saved catalog
    Stats,

    /// Validate the configuration and show what would be crawled
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli.config)?;

    match cli.command {
        Command::Crawl { resume, no_dump } => handle_crawl(config, resume, !no_dump, cli.verbose).await,
        Command::Query { text, title } => handle_query(config, &text, title),
        Command::Stats => handle_stats(config),
        Command::Check => handle_check(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scp_catalog=info,warn"),
            1 => EnvFilter::new("scp_catalog=debug,info"),
            2 => EnvFilter::new("scp_catalog=trace,debug"),
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

/// Loads the configuration file, or validates the defaults when none is given
fn load(path: &Option<PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config).context("built-in configuration is invalid")?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Loads the saved snapshot into the service's catalog
fn load_snapshot(service: &CatalogService) -> anyhow::Result<usize> {
    service
        .load()
        .with_context(|| format!("failed to load {}", service.snapshot_path().display()))
}

/// Handles the crawl command
async fn handle_crawl(config: Config, resume: bool, dump: bool, verbose: u8) -> anyhow::Result<()> {
    let reporter = Arc::new(ConsoleReporter::new(verbose > 0));
    let service = CatalogService::new(config, reporter);

    if resume {
        if service.snapshot_path().exists() {
            load_snapshot(&service)?;
        } else {
            tracing::info!(
                "No snapshot at {}, starting from an empty catalog",
                service.snapshot_path().display()
            );
        }
    }

    let summary = service.crawl().await.context("crawl could not start")?;
    print!("{}", format_summary(&summary));

    if dump {
        service
            .dump()
            .with_context(|| format!("failed to write {}", service.snapshot_path().display()))?;
    }

    Ok(())
}

/// Handles the query command
fn handle_query(config: Config, text: &str, by_title: bool) -> anyhow::Result<()> {
    // Load progress goes to the log only, so stdout carries just the answer
    let service = CatalogService::new(config, Arc::new(LogReporter));
    load_snapshot(&service)?;

    let reply = if by_title {
        service.query_title(text)
    } else {
        service.query(text)
    };
    println!("{}", reply);
    Ok(())
}

/// Handles the stats command
fn handle_stats(config: Config) -> anyhow::Result<()> {
    let service = CatalogService::new(config, Arc::new(LogReporter));
    load_snapshot(&service)?;

    println!("Snapshot: {}\n", service.snapshot_path().display());
    print_statistics(&service.statistics());
    Ok(())
}

/// Handles the check command: validates config and shows what would be crawled
fn handle_check(config: &Config) -> anyhow::Result<()> {
    println!("=== scp-catalog Check ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Code prefix: {}", config.source.code_prefix);
    println!("  Content selector: {}", config.source.content_selector);

    println!("\nCrawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!("\nUser Agent:");
    println!(
        "  {}",
        scp_catalog::crawler::format_user_agent(&config.user_agent)
    );

    println!("\nSnapshot: {}", config.snapshot.path);

    println!("\nIndex Pages ({}):", config.source.lists.len());
    for list in &config.source.lists {
        println!("  - {} ({})", list.url, list.category);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Sends service messages to the log instead of stdout
struct LogReporter;

impl scp_catalog::output::Reporter for LogReporter {
    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}
