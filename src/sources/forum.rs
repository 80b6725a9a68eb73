// src/sources/forum.rs
//
// Forum adapter: fan-out over a fixed list of RSS feed endpoints. Each feed
// is fetched independently; a failing feed is logged and skipped so the
// remaining feeds still contribute. All feeds failing yields an empty result,
// not an error.
//
// Field precedence when normalizing a feed item:
//   id        <- guid, else link, else title
//   content   <- "{title}\n{description}"
//   author    <- dc:creator, else author, else "Unknown"
//   timestamp <- pubDate (RFC 2822, re-emitted as RFC 3339), else "now"
//   engagement <- always zero (feeds carry no engagement counters)
//
// Within one feed the item order is preserved; across feeds the concatenation
// follows the configured feed order.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::error::AggregateError;
use crate::sentiment;
use crate::sources::{normalize_text, now_rfc3339, MentionSource};
use crate::types::{Engagement, Mention, Source};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    // quick-xml's serde deserializer strips namespace prefixes, so
    // <dc:creator> is seen as plain "creator".
    creator: Option<String>,
    author: Option<String>,
}

// <guid isPermaLink="..."> carries attributes, so its text needs a wrapper.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

// Feeds date items in RFC 2822, including obsolete zone names like "GMT".
fn rfc2822_to_rfc3339(ts: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub struct ForumFeedAdapter {
    feeds: Vec<String>,
    client: reqwest::Client,
}

impl ForumFeedAdapter {
    pub fn new(feeds: Vec<String>, client: reqwest::Client) -> Self {
        Self { feeds, client }
    }

    pub(crate) fn parse_payload(xml: &str) -> Result<Vec<Mention>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss = quick_xml::de::from_str(&xml_clean).context("parsing forum feed xml")?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            let description = normalize_text(it.description.as_deref().unwrap_or_default());

            let guid = it.guid.and_then(|g| g.value).filter(|s| !s.is_empty());
            let Some(id) = guid
                .or(it.link)
                .or_else(|| (!title.is_empty()).then(|| title.clone()))
            else {
                continue;
            };

            out.push(Mention {
                id,
                content: format!("{title}\n{description}"),
                author: it
                    .creator
                    .or(it.author)
                    .unwrap_or_else(|| "Unknown".to_string()),
                timestamp: it
                    .pub_date
                    .as_deref()
                    .and_then(rfc2822_to_rfc3339)
                    .unwrap_or_else(now_rfc3339),
                sentiment: sentiment::classify(&format!("{title} {description}")),
                engagement: Engagement::default(),
            });
        }

        histogram!("source_parse_ms", "source" => "forum")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("source_results_total", "source" => "forum").increment(out.len() as u64);
        Ok(out)
    }

    async fn fetch_feed(&self, feed: &str, query: &str) -> Result<Vec<Mention>> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let feed_url = format!("{feed}{encoded}");

        let resp = self
            .client
            .get(&feed_url)
            .send()
            .await
            .with_context(|| format!("fetching feed {feed}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("feed {feed} returned HTTP {status}"));
        }

        let body = resp.text().await.with_context(|| format!("reading feed {feed}"))?;
        Self::parse_payload(&body)
    }
}

#[async_trait]
impl MentionSource for ForumFeedAdapter {
    async fn search(&self, query: &str) -> Result<Vec<Mention>, AggregateError> {
        let mut out = Vec::new();
        for feed in &self.feeds {
            match self.fetch_feed(feed, query).await {
                Ok(mut mentions) => out.append(&mut mentions),
                Err(e) => {
                    // One bad feed never aborts the fan-out.
                    tracing::warn!(error = ?e, feed = %feed, "forum feed skipped");
                    counter!("feed_errors_total").increment(1);
                }
            }
        }
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::Forum
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
