//! Convenience re-exports for common use.

pub use crate::auth::providers::GitHubDeviceAuth;
pub use crate::auth::{
    AuthError, AuthResult, DeviceAuthBackend, DeviceCodeResponse, FileTokenStore,
    GitProviderName, PollHandle, Token, TokenStore,
};
pub use crate::config::GitAuthConfig;
pub use crate::dialog::{DeviceAuthDialog, DialogError, DialogProps, DialogView};
pub use crate::error::{GitAuthError, Result};
