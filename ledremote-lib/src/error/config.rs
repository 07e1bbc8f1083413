//! Configuration error types

/// Errors produced while loading server configuration from the environment.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A port value was not a valid `u16`.
    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    /// A bind address was not a valid IP address.
    #[error("Invalid bind address '{0}'")]
    InvalidAddress(String),

    /// A body limit was not a positive integer.
    #[error("Invalid body limit '{0}'")]
    InvalidBodyLimit(String),
}
