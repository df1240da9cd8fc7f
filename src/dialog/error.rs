use std::any::Any;

use thiserror::Error;

use crate::auth::AuthError;

/// Error surfaced in the dialog's banner.
#[derive(Debug, Clone, Error)]
pub enum DialogError {
    #[error("Device code request failed: {0}")]
    DeviceCode(AuthError),
    #[error("Authorization failed: {0}")]
    Authorization(AuthError),
}

impl DialogError {
    /// Message shown in the banner: the underlying error's text.
    pub fn message(&self) -> String {
        self.source_error().to_string()
    }

    pub fn source_error(&self) -> &AuthError {
        match self {
            Self::DeviceCode(err) | Self::Authorization(err) => err,
        }
    }
}

/// Error reported in place of a result whose backend task panicked.
pub(crate) fn backend_panicked(payload: Box<dyn Any + Send>) -> AuthError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    AuthError::Backend(format!("device authorization backend panicked: {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payload_text_is_kept() {
        let err = backend_panicked(Box::new("boom"));
        assert!(matches!(err, AuthError::Backend(msg) if msg.ends_with("boom")));
        let err = backend_panicked(Box::new(String::from("owned boom")));
        assert!(matches!(err, AuthError::Backend(msg) if msg.ends_with("owned boom")));
        let err = backend_panicked(Box::new(7_u8));
        assert!(matches!(err, AuthError::Backend(msg) if msg.ends_with("unknown panic")));
    }
}
