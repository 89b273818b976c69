use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid store key")]
    InvalidKey,

    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store responded with status {status}")]
    Status { status: u16 },
}

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Deck data unavailable: {0}")]
    DataUnavailable(#[source] SourceError),
}
