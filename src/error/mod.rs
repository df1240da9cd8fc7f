//! Error types for gitauth.

use thiserror::Error;

use crate::auth::{AuthError, GitProviderName};

/// Crate-level error for configuration and front-end plumbing.
#[derive(Error, Debug)]
pub enum GitAuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} authorization was not completed")]
    NotAuthorized(GitProviderName),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GitAuthError>;
