//! gitauth: device-authorization login for Git hosting providers.
//!
//! Provides a headless login dialog that walks a user through the OAuth2
//! device-code grant: it requests a device code, shows the user code and
//! verification link, waits for the user to authorize, then stores the
//! access token against the provider and hands it to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use gitauth::prelude::*;
//!
//! # async fn example() {
//! let mut dialog = DeviceAuthDialog::new(
//!     Arc::new(GitHubDeviceAuth::new("client-id")),
//!     Arc::new(FileTokenStore::new_default()),
//!     GitProviderName::GitHub,
//!     DialogProps::new("podinfo"),
//! );
//! dialog.set_open(true);
//! dialog.process_next().await;
//! println!("{}", dialog.view());
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod dialog;
pub mod error;
pub mod prelude;

#[cfg(feature = "cli")]
pub mod cli;
