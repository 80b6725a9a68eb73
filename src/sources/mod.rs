// src/sources/mod.rs
pub mod forum;
pub mod video;
pub mod web;

use async_trait::async_trait;

use crate::error::AggregateError;
use crate::types::{Mention, Source};

pub use forum::ForumFeedAdapter;
pub use video::VideoSearchAdapter;
pub use web::WebSearchAdapter;

/// One external content provider. Adapters own the provider client and the
/// normalization of its payload into [`Mention`]s; provider response shapes
/// never leak past `search`.
#[async_trait]
pub trait MentionSource: Send + Sync {
    /// Fetch and normalize mentions for a brand query. Zero provider results
    /// is `Ok(vec![])`, not an error.
    async fn search(&self, query: &str) -> Result<Vec<Mention>, AggregateError>;

    fn source(&self) -> Source;
}

/// Normalize provider text: decode HTML entities, strip tags, collapse
/// whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Current time as the RFC 3339 fallback timestamp used when a provider
/// reports none.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tags_and_entities() {
        let s = "<p>Acme&nbsp;is   <b>great</b></p>";
        assert_eq!(normalize_text(s), "Acme is great");
    }
}
