//! OAuth device-code collaborators and token storage.

pub mod backend;
pub mod device_code;
pub mod error;
pub mod handle;
pub mod provider;
pub mod providers;
pub mod store;
pub mod token;

pub use backend::DeviceAuthBackend;
pub use device_code::{DeviceCodeId, DeviceCodePoll, DeviceCodeResponse};
pub use error::AuthError;
pub use handle::{PollFuture, PollHandle};
pub use provider::GitProviderName;
pub use store::{FileTokenStore, TokenStore, TokenStoreConfig};
pub use token::{AuthResult, Token};
