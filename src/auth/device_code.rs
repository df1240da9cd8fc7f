use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token::AuthResult;

/// Identity of one device-code response.
///
/// Two responses with the same user code are still distinct values; a poll
/// is bound to the id, not to the code text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCodeId(Uuid);

impl DeviceCodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DeviceCodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceCodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Device-code details returned by a provider.
///
/// # Example
/// ```no_run
/// use gitauth::auth::DeviceCodeResponse;
/// use chrono::{Duration, Utc};
///
/// let code = DeviceCodeResponse::new(
///     "ABCD-1234",
///     "https://github.com/login/device",
///     "device-code-1",
///     5,
///     Utc::now() + Duration::minutes(15),
/// );
/// assert_eq!(code.user_code, "ABCD-1234");
/// ```
#[derive(Debug, Clone)]
pub struct DeviceCodeResponse {
    pub id: DeviceCodeId,
    pub user_code: String,
    pub validation_uri: String,
    pub device_code: String,
    pub interval_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl DeviceCodeResponse {
    pub fn new(
        user_code: impl Into<String>,
        validation_uri: impl Into<String>,
        device_code: impl Into<String>,
        interval_secs: u64,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DeviceCodeId::new(),
            user_code: user_code.into(),
            validation_uri: validation_uri.into(),
            device_code: device_code.into(),
            interval_secs,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Outcome of a single poll attempt against the provider's token endpoint.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    Pending { interval_secs: u64 },
    SlowDown { interval_secs: u64 },
    Authorized { result: AuthResult },
    AccessDenied,
    Expired,
}
