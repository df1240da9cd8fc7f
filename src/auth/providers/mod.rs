//! Provider-specific device-code clients.

pub mod github;

pub use github::GitHubDeviceAuth;
