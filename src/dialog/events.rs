use crate::auth::{AuthError, AuthResult, DeviceCodeId, DeviceCodeResponse};

/// Internal events reported by spawned operations.
#[derive(Debug)]
pub enum DialogEvent {
    /// A device-code request started in open cycle `cycle` finished.
    DeviceCodeSettled {
        cycle: u64,
        result: Result<DeviceCodeResponse, AuthError>,
    },
    /// The authorization poll bound to `code_id` finished.
    PollSettled {
        code_id: DeviceCodeId,
        result: Result<AuthResult, AuthError>,
    },
}
