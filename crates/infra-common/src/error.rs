use thiserror::Error;

/// Result type for infra-common operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up shared infrastructure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A global tracing subscriber was already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
