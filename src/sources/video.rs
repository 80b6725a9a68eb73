// src/sources/video.rs
//
// Video-platform adapter over the YouTube Data API v3 search endpoint.
//
// Field precedence when normalizing a search item:
//   id        <- id.videoId (items without one are skipped)
//   content   <- "{title}\n{description}"
//   author    <- snippet.channelTitle
//   timestamp <- snippet.publishedAt, else "now"
//   likes     <- statistics.viewCount parsed as integer, else 0
//   shares, comments <- always 0 (search payload carries neither)

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::error::{classify_reqwest, AggregateError};
use crate::sentiment;
use crate::sources::{now_rfc3339, MentionSource};
use crate::types::{Engagement, Mention, Source};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: VideoId,
    snippet: Snippet,
    statistics: Option<Statistics>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

pub struct VideoSearchAdapter {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl VideoSearchAdapter {
    pub fn new(api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn parse_payload(body: &str) -> Result<Vec<Mention>> {
        let t0 = std::time::Instant::now();
        let resp: SearchResponse =
            serde_json::from_str(body).context("parsing video search payload")?;

        let mut out = Vec::with_capacity(resp.items.len());
        for item in resp.items {
            let Some(id) = item.id.video_id else {
                continue;
            };
            let s = &item.snippet;
            let views = item
                .statistics
                .as_ref()
                .and_then(|st| st.view_count.as_deref())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);

            out.push(Mention {
                id,
                content: format!("{}\n{}", s.title, s.description),
                author: s.channel_title.clone(),
                timestamp: s.published_at.clone().unwrap_or_else(now_rfc3339),
                sentiment: sentiment::classify(&format!("{} {}", s.title, s.description)),
                engagement: Engagement {
                    likes: views,
                    shares: 0,
                    comments: 0,
                },
            });
        }

        histogram!("source_parse_ms", "source" => "video")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_results_total", "source" => "video").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl MentionSource for VideoSearchAdapter {
    async fn search(&self, query: &str) -> Result<Vec<Mention>, AggregateError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AggregateError::Misconfigured {
                source: Source::Video,
                detail: "YOUTUBE_API_KEY is not configured".to_string(),
            });
        };

        let url = format!("{}/search", self.base_url);
        let max_results = MAX_RESULTS.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", key),
            ])
            .send()
            .await
            .map_err(|e| classify_reqwest(Source::Video, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AggregateError::SourceUnavailable {
                source: Source::Video,
                cause: anyhow!("video search returned HTTP {status}"),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| classify_reqwest(Source::Video, e))?;
        Self::parse_payload(&body).map_err(|cause| AggregateError::SourceUnavailable {
            source: Source::Video,
            cause,
        })
    }

    fn source(&self) -> Source {
        Source::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentiment;

    const FIXTURE: &str = r#"{
        "items": [
            {
                "id": {"videoId": "abc123"},
                "snippet": {
                    "title": "Acme review: great hardware",
                    "description": "I love this thing",
                    "channelTitle": "TechChan",
                    "publishedAt": "2024-05-01T10:00:00Z"
                },
                "statistics": {"viewCount": "1234"}
            },
            {
                "id": {"kind": "youtube#channel"},
                "snippet": {"title": "no video id", "description": "", "channelTitle": "X"}
            },
            {
                "id": {"videoId": "def456"},
                "snippet": {"title": "unboxing", "description": "", "channelTitle": "Y"}
            }
        ]
    }"#;

    #[test]
    fn maps_fields_with_documented_precedence() {
        let mentions = VideoSearchAdapter::parse_payload(FIXTURE).unwrap();
        assert_eq!(mentions.len(), 2, "items without a videoId are skipped");

        let m = &mentions[0];
        assert_eq!(m.id, "abc123");
        assert_eq!(m.content, "Acme review: great hardware\nI love this thing");
        assert_eq!(m.author, "TechChan");
        assert_eq!(m.timestamp, "2024-05-01T10:00:00Z");
        assert_eq!(m.sentiment, Sentiment::Positive);
        assert_eq!(m.engagement.likes, 1234);
        assert_eq!(m.engagement.shares, 0);
        assert_eq!(m.engagement.comments, 0);
    }

    #[test]
    fn missing_statistics_and_published_at_fall_back() {
        let mentions = VideoSearchAdapter::parse_payload(FIXTURE).unwrap();
        let m = &mentions[1];
        assert_eq!(m.id, "def456");
        assert_eq!(m.engagement.likes, 0);
        assert!(!m.timestamp.is_empty(), "timestamp falls back to now");
    }

    #[test]
    fn zero_results_is_empty_not_error() {
        assert!(VideoSearchAdapter::parse_payload("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(VideoSearchAdapter::parse_payload("not json").is_err());
    }

    #[tokio::test]
    async fn missing_credential_reports_misconfigured() {
        let adapter = VideoSearchAdapter::new(None, reqwest::Client::new());
        let err = adapter.search("acme").await.unwrap_err();
        match err {
            AggregateError::Misconfigured { source, detail } => {
                assert_eq!(source, Source::Video);
                assert!(detail.contains("YOUTUBE_API_KEY"));
            }
            other => panic!("expected Misconfigured, got {other:?}"),
        }
    }
}
