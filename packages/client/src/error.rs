//! Error types for the realtime sync client.

use thiserror::Error;

/// Errors raised by the HTTP API layer
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// The response body did not match the expected shape
    #[error("Malformed response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Errors raised by the realtime transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// WebSocket protocol or I/O error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Outgoing event could not be encoded
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Incoming frame could not be decoded
    #[error("Malformed frame: {0}")]
    Decode(String),

    /// The transport driver is gone
    #[error("Transport link closed")]
    LinkClosed,
}

/// Top-level client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}
