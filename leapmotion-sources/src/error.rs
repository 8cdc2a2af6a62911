//! Error types for leapmotion-sources

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Handshake error: {0}")]
    HandshakeError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Close error: {0}")]
    CloseError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unsupported message: {0}")]
    UnsupportedMessage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Interaction box center must have 3 components, got {len}")]
    InvalidCenter { len: usize },

    #[error("Interaction box size must have 3 components, got {len}")]
    InvalidSize { len: usize },

    #[error("Point must have 3 components, got {len}")]
    InvalidPoint { len: usize },

    #[error("Interaction box has a zero extent on axis {axis}")]
    ZeroExtent { axis: usize },
}

impl SourceError {
    /// True for the shape/extent errors produced by normalization.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SourceError::InvalidCenter { .. }
                | SourceError::InvalidSize { .. }
                | SourceError::InvalidPoint { .. }
                | SourceError::ZeroExtent { .. }
        )
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::SerializationError(err.to_string())
    }
}

impl From<tungstenite::Error> for SourceError {
    fn from(err: tungstenite::Error) -> Self {
        SourceError::WebSocketError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
