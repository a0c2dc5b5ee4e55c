//! Error types for the delivery layer

use thiserror::Error;

/// Home Assistant delivery errors
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Home Assistant returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Home Assistant URL or token not configured")]
    NotConfigured,
}

pub type Result<T> = std::result::Result<T, ControllerError>;
