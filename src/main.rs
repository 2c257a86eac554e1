//! Tankobon main entry point
//!
//! This is the command-line interface for the Tankobon manga catalog fetcher.

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tankobon::config::{load_config_or_default, Config};
use tankobon::crawler::Fetcher;
use tankobon::download::{download_chapter, save_pages, DownloadMode};
use tankobon::providers::{builtin_providers, find_provider, Provider, Stores};
use tankobon::{Chapter, Manga};
use tracing_subscriber::EnvFilter;

/// Tankobon: a manga catalog fetcher
///
/// Tankobon searches manga sites and APIs, lists chapters and pages, and downloads
/// chapter pages. Results are cached per query.
#[derive(Parser, Debug)]
#[command(name = "tankobon")]
#[command(version)]
#[command(about = "A manga catalog fetcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
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
    /// List the built-in providers
    Providers,

    /// Search a provider's catalog
    Search(Target),

    /// List the chapters of a search result
    Chapters(Target),

    /// List the pages of a chapter
    Pages {
        #[command(flatten)]
        target: Target,

        /// Index of the chapter
        #[arg(long)]
        chapter: u16,
    },

    /// Download the pages of a chapter into a directory
    Download {
        #[command(flatten)]
        target: Target,

        /// Index of the chapter
        #[arg(long)]
        chapter: u16,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Remove every cached result
    ClearCache,
}

#[derive(Args, Debug)]
struct Target {
    /// Provider name or ID
    #[arg(short, long)]
    provider: String,

    /// Search query (a title ID for MangaPlus)
    query: String,

    /// Position of the manga in the search results
    #[arg(long, default_value_t = 0)]
    manga: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    let fetcher = Fetcher::new(&config.http)?;
    let stores = Stores::open(&config.cache);
    let providers = builtin_providers(&config, &fetcher, &stores)?;

    match cli.command {
        Command::Providers => {
            for provider in &providers {
                println!("{} ({})", provider.name(), provider.id());
            }
        }
        Command::Search(target) => {
            let provider = find_provider(&providers, &target.provider)?;
            for manga in provider.search(&target.query).await? {
                println!("{:>4}  {}  {}", manga.index, manga.name, manga.url);
            }
        }
        Command::Chapters(target) => {
            let (provider, manga) = resolve_manga(&providers, &target).await?;
            for chapter in provider.chapters_of(&manga).await? {
                println!("{:>4}  [{}]  {}", chapter.index, chapter.number, chapter.name);
            }
        }
        Command::Pages { target, chapter } => {
            let (provider, chapter) = resolve_chapter(&providers, &target, chapter).await?;
            for page in provider.pages_of(&chapter).await? {
                println!("{:>4}  {}", page.index, page.url);
            }
        }
        Command::Download {
            target,
            chapter,
            out,
        } => {
            handle_download(&config, &fetcher, &providers, &target, chapter, out).await?;
        }
        Command::ClearCache => {
            stores.clear()?;
            println!("Cache cleared");
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tankobon=info,warn"),
            1 => EnvFilter::new("tankobon=debug,info"),
            2 => EnvFilter::new("tankobon=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn resolve_manga(
    providers: &[Arc<dyn Provider>],
    target: &Target,
) -> anyhow::Result<(Arc<dyn Provider>, Manga)> {
    let provider = find_provider(providers, &target.provider)?;
    let manga = provider
        .search(&target.query)
        .await?
        .into_iter()
        .find(|manga| manga.index == target.manga)
        .ok_or_else(|| anyhow!("No search result {} for '{}'", target.manga, target.query))?;
    Ok((provider, manga))
}

async fn resolve_chapter(
    providers: &[Arc<dyn Provider>],
    target: &Target,
    index: u16,
) -> anyhow::Result<(Arc<dyn Provider>, Chapter)> {
    let (provider, manga) = resolve_manga(providers, target).await?;
    let chapter = provider
        .chapters_of(&manga)
        .await?
        .into_iter()
        .find(|chapter| chapter.index == index)
        .ok_or_else(|| anyhow!("'{}' has no chapter {}", manga.name, index))?;
    Ok((provider, chapter))
}

/// Handles the download command: lists pages, downloads them and writes them to `out`
async fn handle_download(
    config: &Config,
    fetcher: &Fetcher,
    providers: &[Arc<dyn Provider>],
    target: &Target,
    index: u16,
    out: PathBuf,
) -> anyhow::Result<()> {
    let (provider, mut chapter) = resolve_chapter(providers, target, index).await?;
    chapter.pages = provider.pages_of(&chapter).await?;

    let mode = DownloadMode::from_config(&config.downloader);
    let download = match download_chapter(fetcher, &mut chapter, mode).await {
        Ok(download) => download,
        Err(e) => {
            tracing::error!("Download failed: {}", e);
            return Err(e.into());
        }
    };

    let written = save_pages(&download, &out).await?;
    println!(
        "Downloaded {} pages ({} bytes) of '{}' into {}",
        written.len(),
        download.size,
        chapter.name,
        out.display()
    );

    Ok(())
}
