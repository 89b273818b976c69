use deck::SourceError;
use thiserror::Error;

/// Failure talking to the match or simplification service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Service responded with status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else {
            RemoteError::Transport(e)
        }
    }
}

#[derive(Error, Debug)]
#[error("Match computation failed: {0}")]
pub struct MatchComputationFailed(#[from] pub RemoteError);

#[derive(Error, Debug)]
#[error("Unknown swipe direction: {0}")]
pub struct UnknownDirection(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(String),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build deck source: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
