//! CLI commands and argument parsing

use crate::types::{Engine, Shelf};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Goodreads shelf scraper
#[derive(Parser, Debug)]
#[command(name = "shelfscrape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a shelf and write it as a JSON feed
    Fetch(FetchArgs),

    /// Print the effective configuration as YAML
    Config,

    /// List shelf names accepted by --shelf
    Shelves,
}

/// Arguments of `fetch`
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Transport used to read shelf pages
    #[arg(long, value_enum, default_value_t = Engine::Rss)]
    pub engine: Engine,

    /// Shelf to fetch
    #[arg(short, long, default_value = "#ALL#")]
    pub shelf: Shelf,

    /// Feed file; decorated items go to the matching -progress.json
    #[arg(short, long, default_value = "goodreads-rss-ng.json")]
    pub output: PathBuf,

    /// Keep at most this many items (-1 = all)
    #[arg(short = 'n', long, default_value_t = -1, allow_negative_numbers = true)]
    pub items: i64,

    /// Stop after this many pages (-1 = all)
    #[arg(short, long, allow_negative_numbers = true)]
    pub pages: Option<i64>,

    /// Concurrent reading-progress requests
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Items requested per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Attempts per page, including the first
    #[arg(long)]
    pub retries: Option<u32>,

    /// Skip the reading-progress pass
    #[arg(long)]
    pub no_progress: bool,

    /// Goodreads user id
    #[arg(long, env = "GOODREADS_USER")]
    pub user: Option<String>,

    /// RSS feed key
    #[arg(long, env = "GOODREADS_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Session cookie for signed-in listings
    #[arg(long, env = "GOODREADS_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,
}
