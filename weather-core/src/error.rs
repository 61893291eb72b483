use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single weather fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered with a non-success status. Every non-2xx status
    /// lands here; the status is kept only for diagnostics.
    #[error("City not found: {city} (HTTP {status})")]
    NotFound { city: String, status: StatusCode },

    /// The request could not be completed at all. Carries no URL: the query
    /// string holds the API key.
    #[error("Weather request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// A success response whose body could not be mapped to a record.
    #[error("Unexpected weather response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

/// Rejected dashboard operation. None of these change the city collection.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("City already exists: {name}")]
    DuplicateCity { name: String },

    #[error("Cannot remove the last city")]
    LastCityRemoval,

    #[error("No city with id {id}")]
    UnknownCity { id: u64 },

    #[error("City name is empty")]
    EmptyCityName,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
