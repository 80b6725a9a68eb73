// src/aggregator.rs
//
// Orchestration of one mention search:
//   rate check -> cache lookup -> (miss) retry-wrapped adapter fetch
// Rate-limit rejections are never retried; retry is local to one adapter
// invocation and only spends attempts on transient failures. Successful
// fetches are written through the cache; failures propagate uncached.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::{Config, CACHE_CAPACITY, CACHE_TTL};
use crate::error::AggregateError;
use crate::rate_limit::{CounterStore, RateLimiter};
use crate::retry::{self, RetryPolicy};
use crate::sources::{ForumFeedAdapter, MentionSource, VideoSearchAdapter, WebSearchAdapter};
use crate::types::{Mention, Source, SourceQuery};

pub struct Aggregator {
    limiter: RateLimiter,
    cache: TtlCache<Vec<Mention>>,
    retry: RetryPolicy,
    video: Arc<dyn MentionSource>,
    web: Arc<dyn MentionSource>,
    forum: Arc<dyn MentionSource>,
}

impl Aggregator {
    /// Wire the real adapters from configuration. The counter store is
    /// injected so deployments can share one across processes.
    pub fn new(config: &Config, store: Arc<dyn CounterStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self::with_sources(
            config,
            store,
            Arc::new(VideoSearchAdapter::new(
                config.youtube_api_key.clone(),
                client.clone(),
            )),
            Arc::new(WebSearchAdapter::new(
                config.serpapi_key.clone(),
                client.clone(),
            )),
            Arc::new(ForumFeedAdapter::new(config.forum_feeds.clone(), client)),
        )
    }

    /// Wire explicit adapters; the test seam for fakes.
    pub fn with_sources(
        config: &Config,
        store: Arc<dyn CounterStore>,
        video: Arc<dyn MentionSource>,
        web: Arc<dyn MentionSource>,
        forum: Arc<dyn MentionSource>,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(store, config.rate_limits.clone()),
            cache: TtlCache::new(CACHE_CAPACITY, CACHE_TTL),
            retry: config.retry,
            video,
            web,
            forum,
        }
    }

    fn adapter_for(&self, source: Source) -> &Arc<dyn MentionSource> {
        match source {
            Source::Video => &self.video,
            Source::Web => &self.web,
            Source::Forum => &self.forum,
        }
    }

    /// Run the full pipeline for one (source, query) pair.
    pub async fn search(
        &self,
        source: Source,
        query: &str,
    ) -> Result<Vec<Mention>, AggregateError> {
        let sq = SourceQuery {
            source,
            query: query.to_string(),
        };

        let allowed = self
            .limiter
            .allow(source, &sq.query)
            .await
            .map_err(|cause| AggregateError::SourceUnavailable { source, cause })?;
        if !allowed {
            return Err(AggregateError::RateLimited { source });
        }

        let adapter = self.adapter_for(source);
        self.cache
            .get_or_compute(&sq.key(), || async {
                retry::with_retry_when(
                    &self.retry,
                    || adapter.search(query),
                    AggregateError::is_transient,
                )
                .await
            })
            .await
    }
}
