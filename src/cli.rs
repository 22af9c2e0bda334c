use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newest")]
#[command(
    author,
    version,
    about = "Find the newest release among loosely-named release artifacts and version tags"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Product name prefixed to identifiers (the "pkg" in pkg1.8.1)
    #[arg(short, long, global = true, value_name = "NAME")]
    pub product: Option<String>,

    /// Print install instructions for the newest release
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to config file (default: auto-discover .newestrc.toml or newest.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Query the canonical version feed (default when no command specified)
    Feed {
        /// Feed URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Only consider releases the feed marks stable
        #[arg(long)]
        stable_only: bool,
    },

    /// Page through an object-store listing of release artifacts
    List {
        /// Listing URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Only list objects whose name starts with this prefix
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,

        /// Print every release in newest-first order, not just the newest
        #[arg(long)]
        all: bool,
    },

    /// Show version information
    Version,
}
