//! Tests for cli module

use super::*;
use crate::error::Error;
use crate::types::{Engine, OnError, Shelf};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;

fn fetch_args(cli: &Cli) -> FetchArgs {
    match &cli.command {
        Commands::Fetch(args) => args.clone(),
        other => panic!("expected fetch, got {other:?}"),
    }
}

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_fetch_defaults() {
    let cli = Cli::try_parse_from(["shelfscrape", "fetch"]).unwrap();
    let args = fetch_args(&cli);

    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
    assert_eq!(args.engine, Engine::Rss);
    assert_eq!(args.shelf, Shelf::All);
    assert_eq!(args.output, PathBuf::from("goodreads-rss-ng.json"));
    assert_eq!(args.items, -1);
    assert_eq!(args.pages, None);
    assert!(!args.no_progress);
}

#[test]
fn test_fetch_flags() {
    let cli = Cli::try_parse_from([
        "shelfscrape",
        "-vv",
        "fetch",
        "--engine",
        "html",
        "-s",
        "to-read",
        "-o",
        "out/shelf.json",
        "-n",
        "25",
        "-p",
        "-1",
        "-c",
        "8",
        "--per-page",
        "20",
        "--retries",
        "2",
        "--no-progress",
        "--user",
        "42",
    ])
    .unwrap();
    let args = fetch_args(&cli);

    assert_eq!(cli.verbose, 2);
    assert_eq!(args.engine, Engine::Html);
    assert_eq!(args.shelf, Shelf::ToRead);
    assert_eq!(args.output, PathBuf::from("out/shelf.json"));
    assert_eq!(args.items, 25);
    assert_eq!(args.pages, Some(-1));
    assert_eq!(args.concurrency, Some(8));
    assert_eq!(args.per_page, Some(20));
    assert_eq!(args.retries, Some(2));
    assert!(args.no_progress);
    assert_eq!(args.user.as_deref(), Some("42"));
}

#[test]
fn test_rejects_unknown_shelf() {
    assert!(Cli::try_parse_from(["shelfscrape", "fetch", "--shelf", "favourites"]).is_err());
}

#[test]
fn test_other_commands() {
    let cli = Cli::try_parse_from(["shelfscrape", "shelves"]).unwrap();
    assert!(matches!(cli.command, Commands::Shelves));

    let cli = Cli::try_parse_from(["shelfscrape", "config", "-C", "run.yaml"]).unwrap();
    assert!(matches!(cli.command, Commands::Config));
    assert_eq!(cli.config, Some(PathBuf::from("run.yaml")));
}

// ============================================================================
// Runner Tests
// ============================================================================

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "fetch:\n  max_pages: 3\n  concurrency: 4\n  on_error: skip_and_log"
    )
    .unwrap();
    let config_path = file.path().to_string_lossy().into_owned();

    let cli = Cli::try_parse_from([
        "shelfscrape",
        "--config",
        config_path.as_str(),
        "fetch",
        "--pages",
        "1",
        "--retries",
        "2",
    ])
    .unwrap();
    let args = fetch_args(&cli);
    let config = Runner::new(cli).effective_config(&args).unwrap();

    assert_eq!(config.fetch.max_pages, 1);
    assert_eq!(config.fetch.concurrency, 4);
    assert_eq!(config.fetch.on_error, OnError::SkipAndLog);
    assert_eq!(config.fetch.max_retries(), 2);
}

#[test]
fn test_invalid_flag_values_fail_fast() {
    let cli = Cli::try_parse_from(["shelfscrape", "fetch", "--retries", "0"]).unwrap();
    let args = fetch_args(&cli);
    let err = Runner::new(cli).effective_config(&args).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_fetch_requires_user() {
    let cli = Cli::try_parse_from(["shelfscrape", "fetch", "--user", ""]).unwrap();
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[tokio::test]
async fn test_rss_requires_key() {
    let cli =
        Cli::try_parse_from(["shelfscrape", "fetch", "--user", "42", "--key", ""]).unwrap();
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err.to_string().contains("GOODREADS_KEY"));
}
