//! Hacker News Crawler CLI
//!
//! Scrapes the top-stories tree into Redis and serves the cached read API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hn_crawler::{
    config::Config,
    error::Result,
    server,
    services::{HnClient, Scraper},
    storage::{ItemStore, RedisBackend},
};

/// Hacker News crawler and read API
#[derive(Parser, Debug)]
#[command(name = "hn-crawler", version, about = "Hacker News crawler and read API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the store connection URL
    #[arg(long)]
    store_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the current top stories and their full comment trees
    Scrape {
        /// Worker pool size (bounds concurrent top-level branches)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Serve the read API over the stored items
    Serve {
        /// Bind address, e.g. 127.0.0.1:8901
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print one stored item as JSON
    Get { id: u64 },

    /// Remove one stored item
    Delete { id: u64 },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(url) = cli.store_url {
        config.store.url = url;
    }
    config.validate()?;

    match cli.command {
        Command::Scrape { workers } => {
            let store = connect_store(&config).await?;
            let client = Arc::new(HnClient::new(&config.api)?);
            let workers = workers.unwrap_or(config.scraper.workers);

            let scraper = Scraper::with_workers(client, store, workers);
            let visited = scraper.run().await?;

            log::info!("Scraped {} top-level items", visited);
        }

        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            let store = connect_store(&config).await?;
            server::serve(store, &config.server).await?;
        }

        Command::Get { id } => {
            let store = connect_store(&config).await?;
            match store.item(id).await? {
                Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                None => log::warn!("Item {} is not stored", id),
            }
        }

        Command::Delete { id } => {
            let store = connect_store(&config).await?;
            match store.item(id).await? {
                Some(item) => {
                    store.delete_item(&item).await?;
                    log::info!("Deleted {} {}", item.kind, item.id);
                }
                None => log::warn!("Item {} is not stored", id),
            }
        }

        Command::Validate => {
            log::info!("Configuration OK: {}", cli.config.display());
        }
    }

    Ok(())
}

async fn connect_store(config: &Config) -> Result<ItemStore> {
    let backend = RedisBackend::connect(&config.store.url).await?;
    Ok(ItemStore::new(Arc::new(backend)))
}
