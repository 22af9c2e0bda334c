use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;

use newest::cli::{Cli, Command};
use newest::config::{FEED_URL_ENV, LISTING_URL_ENV, NewestConfig};
use newest::rank::{Batch, FailurePolicy, convert_batch};
use newest::source::{FeedSource, ListingSource, Source};
use newest::version::Converter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle no-color flag
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Some(Command::Version) => {
            println!("newest version {}", VERSION);
            Ok(())
        }
        Some(Command::List { url, prefix, all }) => {
            run_list(&cli, &config, url.as_deref(), prefix.as_deref(), *all).await
        }
        Some(Command::Feed { url, stable_only }) => {
            run_feed(&cli, &config, url.as_deref(), *stable_only).await
        }
        None => run_feed(&cli, &config, None, false).await,
    }
}

fn load_config(cli: &Cli) -> Result<NewestConfig> {
    if let Some(path) = &cli.config {
        return NewestConfig::load_from_path_with_error(path).map_err(|e| anyhow!(e));
    }

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    Ok(NewestConfig::discover(&cwd)
        .map(|(config, _)| config)
        .unwrap_or_default())
}

async fn run_feed(
    cli: &Cli,
    config: &NewestConfig,
    url_flag: Option<&str>,
    stable_only: bool,
) -> Result<()> {
    let Some(url) = config.resolve_feed_url(url_flag) else {
        bail!(
            "no feed URL configured; pass --url, set {}, or add feed_url to newest.toml",
            FEED_URL_ENV
        );
    };

    let converter = Converter::new(config.resolve_product(cli.product.as_deref()));
    let names = FeedSource::new(url, stable_only).fetch().await?;

    // The feed is a curated document: one tag that fails to convert means
    // the feed itself is broken, so the whole run fails.
    let batch = convert_batch(&converter, names, FailurePolicy::Abort)?;

    report(cli, config, batch, false)
}

async fn run_list(
    cli: &Cli,
    config: &NewestConfig,
    url_flag: Option<&str>,
    prefix_flag: Option<&str>,
    all: bool,
) -> Result<()> {
    let Some(url) = config.resolve_listing_url(url_flag) else {
        bail!(
            "no listing URL configured; pass --url, set {}, or add listing_url to newest.toml",
            LISTING_URL_ENV
        );
    };

    let prefix = prefix_flag
        .map(str::to_string)
        .or_else(|| config.listing_prefix.clone());
    let converter = Converter::new(config.resolve_product(cli.product.as_deref()));
    let names = ListingSource::new(&url, prefix)?.fetch().await?;

    // Object names are arbitrary: one malformed upload must not discard an
    // otherwise valid listing.
    let batch = convert_batch(&converter, names, FailurePolicy::Skip)?;

    for failure in &batch.failures {
        eprintln!("{} {}", "Skipped:".yellow(), failure);
    }
    if !batch.failures.is_empty() {
        eprintln!(
            "{} object(s) skipped",
            batch.failures.len().to_string().yellow().bold()
        );
    }

    report(cli, config, batch, all)
}

fn report(cli: &Cli, config: &NewestConfig, mut batch: Batch, all: bool) -> Result<()> {
    batch.sort_newest_first();

    let Some(newest) = batch.records.first() else {
        bail!("no valid versions found");
    };

    if all {
        for record in &batch.records {
            println!("{}  {}", record.version, record.identifier.dimmed());
        }
        return Ok(());
    }

    if cli.verbose {
        let product = config.resolve_product(cli.product.as_deref());
        println!("# Run the following commands:");
        println!("{} install {}@latest", product, newest.identifier.green());
        println!("{} download", newest.identifier.green());
        println!(
            "ln -sf $(which {}) $(which {})",
            newest.identifier, product
        );
    } else {
        println!("{}", newest.identifier);
    }

    Ok(())
}
