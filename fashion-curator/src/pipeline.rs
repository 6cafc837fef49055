use crate::caption::compose_caption;
use crate::config::{CaptionConfig, PipelineConfig};
use crate::rss_utils::url::redact;
use crate::traits::{ContentRewriter, DeduplicationStore, FeedSource, ImageResolver, Publisher};
use crate::types::{FeedItem, RunResult};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The external capabilities one run is wired to.
#[derive(Clone)]
pub struct Capabilities {
    pub feeds: Arc<dyn FeedSource>,
    pub rewriter: Arc<dyn ContentRewriter>,
    pub images: Arc<dyn ImageResolver>,
    pub publisher: Arc<dyn Publisher>,
    pub store: Arc<dyn DeduplicationStore>,
}

/// Per-reason counters for one run. Logged, not reported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub sources_scanned: usize,
    pub source_failures: usize,
    pub items_seen: usize,
    pub duplicates: usize,
    pub rewrite_failures: usize,
    pub image_failures: usize,
    pub publish_failures: usize,
    pub record_failures: usize,
    pub posted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Duplicate,
    RewriteFailed,
    ImageFailed,
    PublishFailed,
    Published,
}

/// Drives one curation run: sources in (optionally shuffled) order, a bounded
/// prefix of items per source, and each item through
/// duplicate check → rewrite → image → publish → record, until the quota is met.
pub struct RunCoordinator {
    capabilities: Capabilities,
    pipeline: PipelineConfig,
    caption: CaptionConfig,
}

impl RunCoordinator {
    pub fn new(capabilities: Capabilities, pipeline: PipelineConfig, caption: CaptionConfig) -> Self {
        Self {
            capabilities,
            pipeline,
            caption,
        }
    }

    /// Run once. Stage failures degrade to skipping an item; the run itself
    /// always completes.
    pub async fn run(&self) -> RunResult {
        let stats = self.run_with_stats().await;
        RunResult::ok(stats.posted)
    }

    pub async fn run_with_stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        let quota = self.pipeline.post_quota;

        info!(
            "Starting run over {} sources (quota {}, {} items per source)",
            self.pipeline.feed_urls.len(),
            quota,
            self.pipeline.items_per_source
        );

        'sources: for source_url in self.ordered_sources() {
            if stats.posted >= quota {
                break;
            }

            stats.sources_scanned += 1;
            let items = match self.capabilities.feeds.fetch(&source_url).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Source {} unavailable, skipping: {}", redact(&source_url), e);
                    stats.source_failures += 1;
                    Vec::new()
                }
            };

            for item in items.into_iter().take(self.pipeline.items_per_source) {
                if stats.posted >= quota {
                    break 'sources;
                }

                stats.items_seen += 1;
                match self.process_item(&item, &mut stats).await {
                    ItemOutcome::Duplicate => stats.duplicates += 1,
                    ItemOutcome::RewriteFailed => stats.rewrite_failures += 1,
                    ItemOutcome::ImageFailed => stats.image_failures += 1,
                    ItemOutcome::PublishFailed => stats.publish_failures += 1,
                    ItemOutcome::Published => {
                        stats.posted += 1;
                        info!("Published {} ({}/{})", item.identifier, stats.posted, quota);

                        // Throttle the channel between posts
                        if stats.posted < quota && !self.pipeline.publish_delay.is_zero() {
                            tokio::time::sleep(self.pipeline.publish_delay).await;
                        }
                    }
                }
            }
        }

        info!(
            "Run finished: posted={} sources={} (failed {}) items={} duplicates={} rewrite_failures={} image_failures={} publish_failures={} record_failures={}",
            stats.posted,
            stats.sources_scanned,
            stats.source_failures,
            stats.items_seen,
            stats.duplicates,
            stats.rewrite_failures,
            stats.image_failures,
            stats.publish_failures,
            stats.record_failures
        );
        stats
    }

    fn ordered_sources(&self) -> Vec<String> {
        let mut sources = self.pipeline.feed_urls.clone();
        if self.pipeline.shuffle_sources {
            sources.shuffle(&mut rand::thread_rng());
        }
        sources
    }

    async fn process_item(&self, item: &FeedItem, stats: &mut RunStats) -> ItemOutcome {
        let caps = &self.capabilities;

        // Fail open: an unreachable store must not block publication
        match caps.store.exists(&item.identifier).await {
            Ok(true) => {
                debug!("Skipping already published {}", item.identifier);
                return ItemOutcome::Duplicate;
            }
            Ok(false) => {}
            Err(e) => warn!("Duplicate check failed for {}, treating as new: {}", item.identifier, e),
        }

        let rewritten = match caps.rewriter.rewrite(&item.title, &item.summary_excerpt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Rewrite failed for {}: {}", item.identifier, e);
                return ItemOutcome::RewriteFailed;
            }
        };

        let image_url = match caps.images.resolve(item.title.trim()).await {
            Ok(url) => url,
            Err(e) => {
                warn!("No image for {}: {}", item.identifier, e);
                return ItemOutcome::ImageFailed;
            }
        };

        let caption = compose_caption(&rewritten, &self.caption);
        if let Err(e) = caps.publisher.publish(&image_url, &caption).await {
            warn!("Publish failed for {}: {}", item.identifier, e);
            return ItemOutcome::PublishFailed;
        }

        // Already delivered; a lost record only risks a future duplicate
        if let Err(e) = caps.store.record(&item.identifier, &item.title).await {
            error!("Failed to record {} after publishing: {}", item.identifier, e);
            stats.record_failures += 1;
        }

        ItemOutcome::Published
    }
}
