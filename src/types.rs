// src/types.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentiment label attached to every mention. Never absent: ties and
/// keyword-free text classify as `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

/// One normalized piece of content referencing the queried brand.
/// Constructed only inside a source adapter's normalization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub content: String,
    pub author: String,
    /// RFC 3339 timestamp, as reported by the provider or "now" when missing.
    pub timestamp: String,
    pub sentiment: Sentiment,
    pub engagement: Engagement,
}

/// Closed set of external content providers. Unknown source names never reach
/// this enum; they are rejected at the HTTP boundary as `InvalidSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Video,
    Web,
    Forum,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Video => "video",
            Source::Web => "web",
            Source::Forum => "forum",
        }
    }

    pub const ALL: [Source; 3] = [Source::Video, Source::Web, Source::Forum];
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Source::Video),
            "web" => Ok(Source::Web),
            "forum" => Ok(Source::Forum),
            _ => Err(()),
        }
    }
}

/// The unit of rate limiting and caching: one (source, query) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceQuery {
    pub source: Source,
    pub query: String,
}

impl SourceQuery {
    /// Deterministic key shared by the cache and the rate limiter.
    pub fn key(&self) -> String {
        format!("{}:{}", self.source, self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parses_case_insensitively() {
        assert_eq!("video".parse::<Source>(), Ok(Source::Video));
        assert_eq!("FORUM".parse::<Source>(), Ok(Source::Forum));
        assert!("twitter".parse::<Source>().is_err());
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        let s = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(s, "\"positive\"");
    }

    #[test]
    fn query_key_is_deterministic() {
        let q = SourceQuery {
            source: Source::Web,
            query: "acme".into(),
        };
        assert_eq!(q.key(), "web:acme");
    }
}
