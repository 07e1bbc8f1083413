//! HTTP server error types

use std::net::SocketAddr;

/// Errors that stop the HTTP front door from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The bound listener could not report its address.
    #[error("Failed to get local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Errors that abort a single request. The connection is dropped without a
/// response.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request body exceeded the configured limit.
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Reading the request body failed.
    #[error("Failed to read request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),
}
