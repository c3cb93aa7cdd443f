use thiserror::Error;

/// Failure talking to one of the external HTTP services (letter generation,
/// archival, spreadsheet). Callers flatten it into a human-readable message.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("API responded with status: {0}")]
    Status(u16),

    #[error("Invalid JSON from upstream: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid upstream URL: {0}")]
    Url(String),
}
