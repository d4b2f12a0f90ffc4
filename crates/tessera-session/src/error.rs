//! Error types for session management.

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No provider is registered under the requested name.
    #[error("Unknown session provider: {0}")]
    ProviderNotFound(String),

    /// A provider was registered twice under the same name.
    #[error("Session provider registered twice: {0}")]
    DuplicateProvider(String),

    /// The manager configuration is unusable.
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),

    /// The random source failed while generating a session token.
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
