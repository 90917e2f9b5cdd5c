use thiserror::Error;

/// Top-level error type for the veritas harness.
#[derive(Debug, Error)]
pub enum VeritasError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Golden set error: {0}")]
    Golden(#[from] GoldenError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Errors from golden-set construction and lookup.
///
/// A missing reference is an error rather than a default score: substituting
/// a value here would silently distort the aggregate leaderboard.
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("no golden record matches query {query:?} with response {response:?}")]
    NoMatch { query: String, response: String },

    #[error("duplicate golden key: query {query:?} with response {response:?}")]
    DuplicateKey { query: String, response: String },

    #[error("golden lookup requires non-empty query and response")]
    EmptyKey,

    #[error("score must be finite, got {value}")]
    NonFiniteScore { value: f64 },
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("could not parse a 1-10 rating from: {0:?}")]
    UnparseableRating(String),

    #[error("model returned an empty response")]
    MissingResponse,
}

pub type Result<T> = std::result::Result<T, VeritasError>;
