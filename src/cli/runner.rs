//! CLI runner - executes commands

use crate::auth::AuthState;
use crate::cli::commands::{Cli, Commands, FetchArgs};
use crate::config::ScrapeConfig;
use crate::decorate::{decorate_all, ReadingProgressFetcher};
use crate::engine::PaginationEngine;
use crate::error::{Error, Result};
use crate::fetch::{HtmlFetcher, RssFetcher};
use crate::http::HttpClient;
use crate::normalize::{ReviewRowNormalizer, RssNormalizer};
use crate::output::{progress_path, write_feed_json, Feed, JsonWriterConfig};
use crate::pagination::{FeedSource, ShelfListSource};
use crate::types::{Engine, OptionStringExt, Shelf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => self.fetch(args).await,
            Commands::Config => self.print_config(),
            Commands::Shelves => {
                for shelf in Shelf::ALL {
                    println!("{shelf}");
                }
                Ok(())
            }
        }
    }

    /// Configuration file contents, or defaults without `--config`
    fn load_config(&self) -> Result<ScrapeConfig> {
        match &self.cli.config {
            Some(path) => ScrapeConfig::load(path),
            None => Ok(ScrapeConfig::default()),
        }
    }

    fn print_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", config.to_yaml()?);
        Ok(())
    }

    /// Configuration for a fetch: file values overridden by flags
    pub fn effective_config(&self, args: &FetchArgs) -> Result<ScrapeConfig> {
        let mut config = self.load_config()?;
        let fetch = &mut config.fetch;

        if let Some(pages) = args.pages {
            fetch.max_pages = pages;
        }
        if let Some(concurrency) = args.concurrency {
            fetch.concurrency = concurrency;
        }
        if let Some(per_page) = args.per_page {
            fetch.page_size = per_page;
        }
        if let Some(retries) = args.retries {
            fetch.retry.max_retries = retries;
        }

        config.validate()?;
        Ok(config)
    }

    async fn fetch(&self, args: &FetchArgs) -> Result<()> {
        let config = self.effective_config(args)?;
        let start = Instant::now();

        let user = args
            .user
            .clone()
            .none_if_empty()
            .ok_or_else(|| Error::missing_field("GOODREADS_USER"))?;

        let auth = AuthState::from_cookie(args.cookie.clone().none_if_empty());
        let client = Arc::new(
            HttpClient::with_config(config.http.client_config())?.with_auth(auth),
        );

        let feed = match args.engine {
            Engine::Rss => {
                let key = args
                    .key
                    .clone()
                    .none_if_empty()
                    .ok_or_else(|| Error::missing_field("GOODREADS_KEY"))?;
                fetch_rss(&config, Arc::clone(&client), &user, &key, args.shelf).await?
            }
            Engine::Html => fetch_html(&config, Arc::clone(&client), &user, args.shelf).await?,
        }
        .truncated(args.items);

        write_feed_json(&args.output, &feed, &JsonWriterConfig::default())?;

        if args.no_progress {
            info!("Done in {}ms", start.elapsed().as_millis());
            return Ok(());
        }

        let decorator = ReadingProgressFetcher::new(client)?
            .with_base_url(config.http.base_url.as_str())
            .with_timeout(config.http.progress_timeout())
            .with_retry(config.fetch.retry.clone());

        let items = decorate_all(
            &feed.items,
            &decorator,
            config.fetch.concurrency,
            config.fetch.on_error,
        )
        .await?;

        write_feed_json(
            progress_path(&args.output),
            &feed.with_items(items),
            &JsonWriterConfig::default(),
        )?;

        info!("Done in {}ms", start.elapsed().as_millis());
        Ok(())
    }
}

/// Fetch a shelf through the RSS feed
pub async fn fetch_rss(
    config: &ScrapeConfig,
    client: Arc<HttpClient>,
    user: &str,
    key: &str,
    shelf: Shelf,
) -> Result<Feed> {
    let source = FeedSource::with_base_url(&config.http.base_url, user, key, shelf)?
        .with_page_size(config.fetch.page_size)?;

    let mut fetcher = RssFetcher::new(client);
    if let Some(timeout) = config.http.page_timeout() {
        fetcher = fetcher.with_timeout(timeout);
    }

    let engine = PaginationEngine::new(fetcher, RssNormalizer::new())
        .with_options(config.fetch.clone());
    Ok(Feed::from_session(engine.fetch_session(&source).await?))
}

/// Fetch a shelf through the HTML review list
pub async fn fetch_html(
    config: &ScrapeConfig,
    client: Arc<HttpClient>,
    user: &str,
    shelf: Shelf,
) -> Result<Feed> {
    let source = ShelfListSource::with_base_url(&config.http.base_url, user, shelf)?
        .with_page_size(config.fetch.page_size)?;

    let mut fetcher = HtmlFetcher::new(client)?;
    if let Some(timeout) = config.http.page_timeout() {
        fetcher = fetcher.with_timeout(timeout);
    }

    let engine = PaginationEngine::new(fetcher, ReviewRowNormalizer::new())
        .with_options(config.fetch.clone());
    Ok(Feed::from_session(engine.fetch_session(&source).await?))
}
