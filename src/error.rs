// src/error.rs
use crate::types::Source;

/// Failure taxonomy for one aggregation request.
///
/// `SourceUnavailable` and `Network` are the only transient kinds; the retry
/// policy refuses to re-attempt anything else.
// Display/Error are implemented by hand (rather than via thiserror) because
// the `source: Source` fields would otherwise be inferred as the error source.
#[derive(Debug)]
pub enum AggregateError {
    /// Unknown source name. Rejected at the boundary before any rate-limit
    /// or cache interaction.
    InvalidSource(String),

    /// Fixed-window quota exceeded for this (source, query). A hard
    /// rejection, not a delay: the caller should back off and retry later.
    RateLimited { source: Source },

    /// A required credential or connection parameter is missing. Operator
    /// fixable, pointless to retry.
    Misconfigured { source: Source, detail: String },

    /// The provider answered but with an application-level failure
    /// (non-success status, unparseable payload).
    SourceUnavailable { source: Source, cause: anyhow::Error },

    /// Transport-level failure: connection refused, timeout, DNS.
    Network { source: Source, cause: anyhow::Error },
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::InvalidSource(name) => write!(f, "invalid source '{name}'"),
            AggregateError::RateLimited { source } => {
                write!(f, "rate limit exceeded for {source}")
            }
            AggregateError::Misconfigured { detail, .. } => f.write_str(detail),
            AggregateError::SourceUnavailable { source, .. } => {
                write!(f, "search against {source} failed")
            }
            AggregateError::Network { source, .. } => {
                write!(f, "network error while reaching {source}")
            }
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AggregateError::SourceUnavailable { cause, .. }
            | AggregateError::Network { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl AggregateError {
    /// Transient errors are worth another attempt; everything else is
    /// returned to the caller as-is.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AggregateError::SourceUnavailable { .. } | AggregateError::Network { .. }
        )
    }

    pub fn source_name(&self) -> Option<Source> {
        match self {
            AggregateError::InvalidSource(_) => None,
            AggregateError::RateLimited { source }
            | AggregateError::Misconfigured { source, .. }
            | AggregateError::SourceUnavailable { source, .. }
            | AggregateError::Network { source, .. } => Some(*source),
        }
    }
}

/// Map a reqwest failure onto the taxonomy: transport-level problems become
/// `Network`, everything else `SourceUnavailable`.
pub fn classify_reqwest(source: Source, err: reqwest::Error) -> AggregateError {
    if err.is_connect() || err.is_timeout() {
        AggregateError::Network {
            source,
            cause: err.into(),
        }
    } else {
        AggregateError::SourceUnavailable {
            source,
            cause: err.into(),
        }
    }
}
