use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session provider is not configured: {0}")]
    Config(String),

    #[error("session provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session provider returned a non-JSON body (status {status}): {source}")]
    InvalidBody {
        status: u16,
        source: serde_json::Error,
    },
}
