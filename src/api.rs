// src/api.rs
//
// HTTP boundary. One search endpoint plus health, with the error taxonomy
// mapped onto status codes:
//   InvalidSource -> 400, RateLimited -> 429, Misconfigured -> 500,
//   SourceUnavailable -> 500, Network -> 503.
// Error bodies always carry `error`, the affected `source` when known, and a
// timestamp, so callers can distinguish business failures from transport
// failures and back off accordingly.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::aggregator::Aggregator;
use crate::error::AggregateError;
use crate::types::{Mention, Source};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/mentions", get(mentions))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct MentionsParams {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    query: Option<String>,
}

#[derive(serde::Serialize)]
struct MentionsResponse {
    mentions: Vec<Mention>,
    source: Source,
    query: String,
    timestamp: String,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    timestamp: String,
}

async fn mentions(
    State(state): State<AppState>,
    Query(params): Query<MentionsParams>,
) -> Response {
    let (source_raw, query) = match (params.source, params.query) {
        (Some(s), Some(q)) if !s.trim().is_empty() && !q.trim().is_empty() => (s, q),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "source and query parameters are required",
                None,
                None,
            );
        }
    };

    let Ok(source) = source_raw.parse::<Source>() else {
        let err = AggregateError::InvalidSource(source_raw);
        return aggregate_error_response(err);
    };

    counter!("mention_requests_total", "source" => source.as_str()).increment(1);

    match state.aggregator.search(source, &query).await {
        Ok(mentions) => Json(MentionsResponse {
            mentions,
            source,
            query,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
        .into_response(),
        Err(err) => aggregate_error_response(err),
    }
}

fn status_for(err: &AggregateError) -> StatusCode {
    match err {
        AggregateError::InvalidSource(_) => StatusCode::BAD_REQUEST,
        AggregateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        AggregateError::Misconfigured { .. } | AggregateError::SourceUnavailable { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AggregateError::Network { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn aggregate_error_response(err: AggregateError) -> Response {
    let details = match &err {
        AggregateError::SourceUnavailable { cause, .. }
        | AggregateError::Network { cause, .. } => Some(format!("{cause:#}")),
        _ => None,
    };
    let source = err.source_name().map(|s| s.to_string());

    tracing::warn!(error = %err, source = source.as_deref().unwrap_or("-"), "request failed");
    error_response(status_for(&err), &err.to_string(), source, details)
}

fn error_response(
    status: StatusCode,
    error: &str,
    source: Option<String>,
    details: Option<String>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            source,
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
        .into_response()
}
