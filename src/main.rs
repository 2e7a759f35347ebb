use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rss_reader::app::{self, Outcome, RunError, RunOptions};
use rss_reader::config::Config;
use rss_reader::feed::Fetcher;
use rss_reader::output::{parse_date_arg, EntryFilter};

#[derive(Parser, Debug)]
#[command(name = "rss_reader", version, about = "Pure Rust command-line RSS reader.")]
struct Args {
    /// RSS URL
    source: String,

    /// Print result as JSON in stdout
    #[arg(long)]
    json: bool,

    /// Outputs verbose status messages
    #[arg(long)]
    verbose: bool,

    /// Limit news topics if this parameter provided
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Colorizes the output
    #[arg(long)]
    colorize: bool,

    /// Show news for the chosen date (YYYYMMDD or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Read from the cache only, without fetching
    #[arg(long)]
    offline: bool,

    /// Directory for the XML cache and JSON exports
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/rss_reader/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    tracing::info!("Parsing arguments");

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let fetcher = Fetcher::new(&config).context("Failed to build HTTP client")?;

    let options = RunOptions {
        source: args.source,
        json: args.json,
        filter: EntryFilter {
            limit: args.limit.and_then(|l| usize::try_from(l).ok()),
            date: args.date,
        },
        colorize: args.colorize || config.colorize,
        offline: args.offline,
        cache_dir: args.cache_dir.unwrap_or(config.cache_dir),
    };

    let mut stdout = std::io::stdout().lock();
    match app::run(&options, &fetcher, &mut stdout).await {
        Ok(Outcome::Displayed { entries }) => {
            tracing::info!(entries = entries, "Done!");
            Ok(())
        }
        Ok(Outcome::NothingToDisplay) => {
            println!("Nothing to display.");
            Ok(())
        }
        Err(RunError::Output(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            std::process::exit(1);
        }
    }
}
