//! Error types for the catalog and trending layers.

use thiserror::Error;

/// Failures talking to the movie catalog.
///
/// Transport-level variants keep the previous result list on screen; only a
/// catalog-reported rejection clears it (see `finder::FetchOutcome`).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog API token configured")]
    MissingToken,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("Failed to fetch movies: {0}")]
    Status(String),

    #[error("unreadable catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Failures in the trending store. Never shown to the user.
#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("http: {0}")]
    Http(String),

    #[error("bad store payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("trending store not configured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TrendingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
