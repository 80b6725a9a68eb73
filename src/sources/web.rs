// src/sources/web.rs
//
// Web-search adapter over SerpAPI's Google engine.
//
// Field precedence when normalizing an organic result:
//   id        <- link
//   content   <- "{title}\n{snippet}"
//   author    <- displayed_link
//   timestamp <- always "now" (the provider reports no publication time)
//   engagement <- always zero
//
// A payload without `organic_results` is a zero-result answer, not a failure.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::error::{classify_reqwest, AggregateError};
use crate::sentiment;
use crate::sources::{now_rfc3339, MentionSource};
use crate::types::{Engagement, Mention, Source};

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const NUM_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    displayed_link: String,
}

pub struct WebSearchAdapter {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl WebSearchAdapter {
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
            serde_json::from_str(body).context("parsing web search payload")?;

        let out: Vec<Mention> = resp
            .organic_results
            .into_iter()
            .map(|r| Mention {
                id: r.link,
                content: format!("{}\n{}", r.title, r.snippet),
                author: r.displayed_link,
                timestamp: now_rfc3339(),
                sentiment: sentiment::classify(&format!("{} {}", r.title, r.snippet)),
                engagement: Engagement::default(),
            })
            .collect();

        histogram!("source_parse_ms", "source" => "web")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_results_total", "source" => "web").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl MentionSource for WebSearchAdapter {
    async fn search(&self, query: &str) -> Result<Vec<Mention>, AggregateError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AggregateError::Misconfigured {
                source: Source::Web,
                detail: "SERPAPI_KEY is not configured".to_string(),
            });
        };

        let url = format!("{}/search.json", self.base_url);
        let num = NUM_RESULTS.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", key),
            ])
            .send()
            .await
            .map_err(|e| classify_reqwest(Source::Web, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AggregateError::SourceUnavailable {
                source: Source::Web,
                cause: anyhow!("web search returned HTTP {status}"),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| classify_reqwest(Source::Web, e))?;
        Self::parse_payload(&body).map_err(|cause| AggregateError::SourceUnavailable {
            source: Source::Web,
            cause,
        })
    }

    fn source(&self) -> Source {
        Source::Web
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentiment;

    const FIXTURE: &str = r#"{
        "organic_results": [
            {
                "link": "https://example.com/review",
                "title": "Acme review",
                "snippet": "terrible support, awful firmware",
                "displayed_link": "example.com > reviews"
            },
            {
                "title": "no link at all"
            }
        ]
    }"#;

    #[test]
    fn maps_fields_with_documented_precedence() {
        let mentions = WebSearchAdapter::parse_payload(FIXTURE).unwrap();
        assert_eq!(mentions.len(), 2);

        let m = &mentions[0];
        assert_eq!(m.id, "https://example.com/review");
        assert_eq!(m.content, "Acme review\nterrible support, awful firmware");
        assert_eq!(m.author, "example.com > reviews");
        assert_eq!(m.sentiment, Sentiment::Negative);
        assert_eq!(m.engagement, Engagement::default());
        assert!(!m.timestamp.is_empty(), "timestamp is always now");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let mentions = WebSearchAdapter::parse_payload(FIXTURE).unwrap();
        let m = &mentions[1];
        assert_eq!(m.id, "");
        assert_eq!(m.content, "no link at all\n");
        assert_eq!(m.author, "");
    }

    #[test]
    fn absent_organic_results_is_zero_results() {
        assert!(WebSearchAdapter::parse_payload("{}").unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_credential_reports_misconfigured() {
        let adapter = WebSearchAdapter::new(None, reqwest::Client::new());
        let err = adapter.search("acme").await.unwrap_err();
        match err {
            AggregateError::Misconfigured { source, detail } => {
                assert_eq!(source, Source::Web);
                assert!(detail.contains("SERPAPI_KEY"));
            }
            other => panic!("expected Misconfigured, got {other:?}"),
        }
    }
}
