use thiserror::Error;

/// Normalized authentication errors across providers.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Access denied")]
    AccessDenied,
    #[error("Device code expired")]
    Expired,
    #[error("Authorization cancelled")]
    Cancelled,
    #[error("Backend failure: {0}")]
    Backend(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("{code}: {description}")]
    Provider { code: String, description: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_code_and_description() {
        let err = AuthError::Provider {
            code: "incorrect_client_credentials".to_string(),
            description: "The client_id is not valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "incorrect_client_credentials: The client_id is not valid"
        );
    }

    #[test]
    fn io_errors_convert_to_io_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(AuthError::from(io), AuthError::Io(msg) if msg.contains("nope")));
    }
}
