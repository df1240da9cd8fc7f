//! Injected device-authorization operations.

use async_trait::async_trait;

use super::device_code::DeviceCodeResponse;
use super::error::AuthError;
use super::handle::PollHandle;

/// Device-authorization operations the dialog depends on.
///
/// Implement this trait for each provider (or a test double) and hand it to
/// [`crate::dialog::DeviceAuthDialog::new`]. Poll cadence, long-polling and
/// timeouts are the implementation's business; the dialog never retries.
#[async_trait]
pub trait DeviceAuthBackend: Send + Sync {
    /// Request a fresh device code.
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError>;

    /// Start waiting for the user to authorize `code`.
    ///
    /// The returned handle must be cancellable; after cancellation its result
    /// is ignored.
    fn poll_authorization_status(&self, code: &DeviceCodeResponse) -> PollHandle;
}
