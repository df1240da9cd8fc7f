//! Inner view bound to a single device-code response.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::auth::{DeviceAuthBackend, DeviceCodeId, DeviceCodeResponse, GitProviderName};

use super::error::backend_panicked;
use super::events::DialogEvent;
use super::view::DialogBody;

/// Shows one device code and waits for its authorization.
///
/// The wait starts in [`PollingView::mount`] and is cancelled when the view
/// is dropped. A cancelled wait never reports back.
#[derive(Debug)]
pub struct PollingView {
    code: DeviceCodeResponse,
    loading: bool,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl PollingView {
    /// Start polling `code` and report the outcome on `events`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(
        code: DeviceCodeResponse,
        backend: &dyn DeviceAuthBackend,
        events: mpsc::UnboundedSender<DialogEvent>,
    ) -> Self {
        let handle = backend.poll_authorization_status(&code);
        let cancel = handle.cancel_token();
        let guard = handle.drop_guard();
        let code_id = code.id;
        tracing::debug!(%code_id, "authorization poll started");

        let token = cancel.clone();
        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(handle.wait()).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) if !token.is_cancelled() => Some(Err(backend_panicked(panic))),
                Err(_) => None,
            };
            match outcome {
                Some(result) => {
                    let _ = events.send(DialogEvent::PollSettled { code_id, result });
                }
                None => tracing::debug!(%code_id, "authorization poll cancelled"),
            }
        });

        Self {
            code,
            loading: true,
            cancel,
            _guard: guard,
        }
    }

    /// Whether the authorization wait is still in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a result for `code_id` belongs to this live view.
    pub(crate) fn accepts(&self, code_id: DeviceCodeId) -> bool {
        self.code.id == code_id && !self.cancel.is_cancelled()
    }

    /// Stop the loading indicator once the wait has resolved.
    pub(crate) fn settle(&mut self) {
        self.loading = false;
    }

    pub fn body(&self, provider: GitProviderName) -> DialogBody {
        DialogBody::Polling {
            user_code: self.code.user_code.clone(),
            validation_uri: self.code.validation_uri.clone(),
            button_label: format!("Authorize {provider} Access"),
            waiting: self.loading,
        }
    }
}
