//! Device-authorization dialog: outer controller, inner polling view, and
//! the view model both render into.
//!
//! The controller is owned by one task and mutated through `&mut self`.
//! Everything asynchronous runs in spawned tasks that report back over an
//! event channel, so controller state is never shared.

pub mod controller;
pub mod error;
pub mod events;
pub mod polling;
pub mod view;

pub use controller::{DeviceAuthDialog, DialogProps, OnClose, OnSuccess};
pub use error::DialogError;
pub use events::DialogEvent;
pub use polling::PollingView;
pub use view::{DialogBody, DialogView, ErrorBanner};
