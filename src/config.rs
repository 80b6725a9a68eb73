// src/config.rs
//
// Environment-derived configuration. Credentials are optional at startup so
// a partially configured deployment still serves the sources it can; the
// affected adapter reports a misconfiguration at request time instead of the
// process refusing to boot.

use std::collections::HashMap;
use std::time::Duration;

use crate::rate_limit::RateLimit;
use crate::retry::RetryPolicy;
use crate::types::Source;

pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_SERPAPI_KEY: &str = "SERPAPI_KEY";

pub const CACHE_CAPACITY: usize = 500;
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Forum feeds searched on every forum query; the brand query is URL-encoded
/// and appended to each.
pub const FORUM_FEEDS: &[&str] = &[
    "https://www.reddit.com/r/all/search.rss?q=",
    "https://forum.example.com/feed?q=",
    "https://www.quora.com/feed/topic/",
    "https://stackoverflow.com/feeds/tag/",
    "https://www.producthunt.com/feed?q=",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub youtube_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub forum_feeds: Vec<String>,
    pub rate_limits: HashMap<Source, RateLimit>,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            serpapi_key: None,
            forum_feeds: FORUM_FEEDS.iter().map(|s| s.to_string()).collect(),
            rate_limits: default_rate_limits(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Read credentials from the environment (after `dotenvy` has loaded
    /// `.env` in dev). Empty values count as missing.
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: non_empty_env(ENV_YOUTUBE_API_KEY),
            serpapi_key: non_empty_env(ENV_SERPAPI_KEY),
            ..Self::default()
        }
    }
}

/// Per-source fixed-window budgets: video 100/hour, web 100/hour,
/// forum 200/hour.
pub fn default_rate_limits() -> HashMap<Source, RateLimit> {
    let hour = Duration::from_secs(60 * 60);
    HashMap::from([
        (
            Source::Video,
            RateLimit {
                max_requests: 100,
                window: hour,
            },
        ),
        (
            Source::Web,
            RateLimit {
                max_requests: 100,
                window: hour,
            },
        ),
        (
            Source::Forum,
            RateLimit {
                max_requests: 200,
                window: hour,
            },
        ),
    ])
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
