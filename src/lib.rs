// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rate_limit;
pub mod retry;
pub mod sentiment;
pub mod sources;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::aggregator::Aggregator;
pub use crate::api::{router, AppState};
pub use crate::error::AggregateError;
pub use crate::types::{Engagement, Mention, Sentiment, Source, SourceQuery};
