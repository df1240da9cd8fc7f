use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::auth::backend::DeviceAuthBackend;
use crate::auth::device_code::{DeviceCodePoll, DeviceCodeResponse};
use crate::auth::error::AuthError;
use crate::auth::handle::PollHandle;
use crate::auth::token::AuthResult;
use crate::config::GitHubSettings;

const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";
/// Extra wait added on `slow_down` (RFC 8628 section 3.5).
const SLOW_DOWN_STEP_SECS: u64 = 5;

/// GitHub OAuth device-code client.
///
/// # Example
/// ```no_run
/// use gitauth::auth::providers::GitHubDeviceAuth;
///
/// let auth = GitHubDeviceAuth::new("my-client-id").with_scope("repo");
/// ```
#[derive(Debug, Clone)]
pub struct GitHubDeviceAuth {
    client: reqwest::Client,
    client_id: String,
    scope: String,
    device_code_url: String,
    access_token_url: String,
}

impl GitHubDeviceAuth {
    pub fn new(client_id: impl Into<String>) -> Self {
        let defaults = GitHubSettings::default();
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            scope: defaults.scope,
            device_code_url: defaults.device_code_url,
            access_token_url: defaults.access_token_url,
        }
    }

    pub fn from_settings(settings: &GitHubSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: settings.client_id.clone(),
            scope: settings.scope.clone(),
            device_code_url: settings.device_code_url.clone(),
            access_token_url: settings.access_token_url.clone(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub async fn start_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::Configuration(
                "GitHub OAuth client id is not set".to_string(),
            ));
        }
        let resp = self
            .client
            .post(&self.device_code_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "Device code request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceCodePayload = decode_json(resp, "device code").await?;
        let (device_code, user_code, verification_uri, expires_in, interval) =
            match payload {
                DeviceCodePayload::Granted {
                    device_code,
                    user_code,
                    verification_uri,
                    expires_in,
                    interval,
                } => (device_code, user_code, verification_uri, expires_in, interval),
                DeviceCodePayload::Failed {
                    error,
                    error_description,
                } => {
                    return Err(AuthError::Provider {
                        code: error,
                        description: error_description.unwrap_or_default(),
                    })
                }
            };
        let expires_at = expiry_from_now(expires_in)?;
        tracing::debug!(user_code = %user_code, interval, "github device code issued");
        Ok(DeviceCodeResponse::new(
            user_code,
            verification_uri,
            device_code,
            interval,
            expires_at,
        ))
    }

    /// Make one token request for `code`.
    pub async fn poll_once(&self, code: &DeviceCodeResponse) -> Result<DeviceCodePoll, AuthError> {
        if code.is_expired() {
            return Ok(DeviceCodePoll::Expired);
        }
        let resp = self
            .client
            .post(&self.access_token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("device_code", code.device_code.as_str()),
                ("grant_type", DEVICE_GRANT_TYPE),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "Device token request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceTokenPayload = decode_json(resp, "device token").await?;
        if let Some(access_token) = payload.access_token {
            return Ok(DeviceCodePoll::Authorized {
                result: AuthResult {
                    access_token,
                    scopes: payload.scope.map(|s| {
                        s.split(',')
                            .map(|v| v.trim().to_string())
                            .filter(|v| !v.is_empty())
                            .collect()
                    }),
                },
            });
        }
        match payload.error.as_deref() {
            Some("authorization_pending") => Ok(DeviceCodePoll::Pending {
                interval_secs: code.interval_secs,
            }),
            Some("slow_down") => Ok(DeviceCodePoll::SlowDown {
                interval_secs: payload
                    .interval
                    .unwrap_or(code.interval_secs + SLOW_DOWN_STEP_SECS),
            }),
            Some("expired_token") => Ok(DeviceCodePoll::Expired),
            Some("access_denied") => Ok(DeviceCodePoll::AccessDenied),
            Some(other) => Err(AuthError::Provider {
                code: other.to_string(),
                description: payload.error_description.unwrap_or_default(),
            }),
            None => Err(AuthError::InvalidResponse(
                "Device token response missing token and error".to_string(),
            )),
        }
    }

    /// Poll until the user authorizes, denies, or the code expires.
    ///
    /// Returns [`AuthError::Cancelled`] as soon as `cancel` fires.
    pub async fn wait_for_authorization(
        &self,
        code: &DeviceCodeResponse,
        cancel: CancellationToken,
    ) -> Result<AuthResult, AuthError> {
        let mut interval_secs = code.interval_secs.max(1);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthError::Cancelled),
                _ = tokio::time::sleep(StdDuration::from_secs(interval_secs)) => {}
            }
            let poll = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AuthError::Cancelled),
                poll = self.poll_once(code) => poll?,
            };
            match poll {
                DeviceCodePoll::Authorized { result } => return Ok(result),
                DeviceCodePoll::Pending { .. } => {}
                DeviceCodePoll::SlowDown { interval_secs: next } => {
                    tracing::debug!(interval_secs = next, "github asked to slow down");
                    interval_secs = next.max(interval_secs);
                }
                DeviceCodePoll::AccessDenied => return Err(AuthError::AccessDenied),
                DeviceCodePoll::Expired => return Err(AuthError::Expired),
            }
        }
    }
}

#[async_trait]
impl DeviceAuthBackend for GitHubDeviceAuth {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        self.start_device_code().await
    }

    fn poll_authorization_status(&self, code: &DeviceCodeResponse) -> PollHandle {
        let auth = self.clone();
        let code = code.clone();
        PollHandle::spawn_with(move |cancel| async move {
            auth.wait_for_authorization(&code, cancel).await
        })
    }
}

/// Absolute expiry for a code that lives `expires_in` seconds.
fn expiry_from_now(expires_in: u64) -> Result<DateTime<Utc>, AuthError> {
    i64::try_from(expires_in)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            AuthError::InvalidResponse(format!("Device code expires_in out of range: {expires_in}"))
        })
}

async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &str,
) -> Result<T, AuthError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|err| AuthError::InvalidResponse(format!("Malformed {what} response: {err}")))
}

/// RFC 8628 section 3.2 default when `interval` is omitted.
fn default_interval() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeviceCodePayload {
    Granted {
        device_code: String,
        user_code: String,
        verification_uri: String,
        expires_in: u64,
        #[serde(default = "default_interval")]
        interval: u64,
    },
    Failed {
        error: String,
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct DeviceTokenPayload {
    access_token: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    interval: Option<u64>,
}
