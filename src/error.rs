use crate::model::SwapStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwapError>;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: cannot {event} a {from} swap request")]
    InvalidTransition { from: SwapStatus, event: &'static str },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream service unavailable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SwapError {
    /// Transport failures are reported to callers as an empty result plus
    /// this flag rather than a hard error.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SwapError::Upstream(_))
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Io(err.to_string())
    }
}
