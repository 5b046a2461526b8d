use thiserror::Error;

/// Failure talking to the chat backend.
///
/// Both kinds are recovered locally by the session; a backend that answers
/// with an `error` field is not a `ClientError`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, reset, or the body could not be read.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
