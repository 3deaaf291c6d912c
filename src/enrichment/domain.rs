//! Internal domain models for book lookups.
//!
//! These types are OUR types - they don't change when the Open Library API
//! changes. All API responses get converted into these via the adapter.

/// What a title/author search found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMatch {
    /// Preferred ISBN (13-digit when available); empty if none listed
    pub isbn: String,
    /// Medium cover image URL; empty if the work has no cover
    pub cover_url: String,
}

/// What an ISBN lookup found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverMatch {
    /// Cover image URL; empty if the edition has no cover
    pub cover_url: String,
}

/// Result of a single lookup operation.
///
/// Every variant other than `Found` counts as "no result" for the import,
/// but transient failures are kept apart so callers can decide not to
/// cache them.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<T> {
    /// The service had an entry
    Found(T),
    /// The service answered and has nothing for this query
    NotFound,
    /// The request failed (network, timeout, bad response)
    TransientError(EnrichmentError),
}

impl<T> LookupOutcome<T> {
    /// Fold a client result into an outcome. `NoMatches` is a definitive miss.
    pub fn from_result(result: Result<Option<T>, EnrichmentError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) | Err(EnrichmentError::NoMatches) => Self::NotFound,
            Err(e) => Self::TransientError(e),
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientError(_))
    }
}

/// Errors that can occur while talking to the bibliographic API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
