use thiserror::Error;

/// Errors raised while talking to the portal backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
