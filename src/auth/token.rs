use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a completed device authorization.
///
/// Transient: handed to token storage and to the caller, never retained by
/// the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub access_token: String,
    pub scopes: Option<Vec<String>>,
}

impl AuthResult {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scopes: None,
        }
    }

    /// Convert into the persisted token form, stamped with the current time.
    pub fn into_token(self) -> Token {
        Token {
            access_token: self.access_token,
            scopes: self.scopes,
            obtained_at: Some(Utc::now()),
        }
    }
}

/// Provider token payload stored in a token store.
///
/// # Example
/// ```no_run
/// use gitauth::auth::Token;
///
/// let token = Token {
///     access_token: "gho_abc".to_string(),
///     scopes: Some(vec!["repo".to_string()]),
///     obtained_at: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub scopes: Option<Vec<String>>,
    pub obtained_at: Option<DateTime<Utc>>,
}
