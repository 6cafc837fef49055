use anyhow::{bail, Context};
use clap::Parser;
use fashion_curator::{
    AppConfig, Capabilities, DeduplicationStore, GeminiRewriter, LogPublisher, MemoryDedupStore,
    PgDedupStore, Publisher, RssFeedAggregator, RunCoordinator, SearchApiImageResolver,
    TelegramPublisher,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Curate fashion news into a broadcast channel, one bounded run per invocation.
#[derive(Debug, Parser)]
#[command(name = "fashion-curator", version)]
struct Cli {
    /// Override the number of posts allowed in this run
    #[arg(long)]
    quota: Option<usize>,

    /// Override how many items of each source are considered
    #[arg(long)]
    items_per_source: Option<usize>,

    /// Scan sources in configured order
    #[arg(long)]
    no_shuffle: bool,

    /// Log captions instead of publishing and keep records in memory
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(quota) = cli.quota {
        config.pipeline.post_quota = quota;
    }
    if let Some(items) = cli.items_per_source {
        config.pipeline.items_per_source = items;
    }
    if cli.no_shuffle {
        config.pipeline.shuffle_sources = false;
    }

    info!("Starting fashion curator{}", if cli.dry_run { " (dry run)" } else { "" });

    let feeds = Arc::new(RssFeedAggregator::new(
        config.fetch.clone(),
        config.pipeline.excerpt_max_chars,
    )?);
    let rewriter = Arc::new(GeminiRewriter::new(config.rewriter.clone(), &config.fetch)?);
    let images = Arc::new(SearchApiImageResolver::new(config.image_search.clone(), &config.fetch)?);

    let (publisher, store): (Arc<dyn Publisher>, Arc<dyn DeduplicationStore>) = if cli.dry_run {
        let publisher: Arc<dyn Publisher> = Arc::new(LogPublisher);
        let store: Arc<dyn DeduplicationStore> = Arc::new(MemoryDedupStore::new(config.pipeline.title_max_chars));
        (publisher, store)
    } else {
        let Some(telegram) = config.telegram.clone() else {
            bail!("TELEGRAM_BOT_TOKEN and TELEGRAM_CHANNEL_ID must be set unless --dry-run is given");
        };
        let Some(database_url) = config.database_url.as_deref() else {
            bail!("DATABASE_URL must be set unless --dry-run is given");
        };

        let store = PgDedupStore::new(database_url, config.fetch.timeout(), config.pipeline.title_max_chars)?;
        // The store is fail-open, so a database outage here must not stop the run
        if let Err(e) = store.setup_schema().await {
            warn!("Could not prepare published_posts table: {}", e);
        }

        let publisher: Arc<dyn Publisher> = Arc::new(TelegramPublisher::new(telegram, &config.fetch)?);
        let store: Arc<dyn DeduplicationStore> = Arc::new(store);
        (publisher, store)
    };

    let coordinator = RunCoordinator::new(
        Capabilities {
            feeds,
            rewriter,
            images,
            publisher,
            store,
        },
        config.pipeline.clone(),
        config.caption.clone(),
    );

    let result = coordinator.run().await;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
