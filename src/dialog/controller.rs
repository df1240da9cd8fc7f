//! Outer dialog controller.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::auth::{
    AuthResult, DeviceAuthBackend, DeviceCodeResponse, GitProviderName, TokenStore,
};

use super::error::{backend_panicked, DialogError};
use super::events::DialogEvent;
use super::polling::PollingView;
use super::view::{DialogBody, DialogView, ErrorBanner};

/// Called with the access token once authorization succeeds.
pub type OnSuccess = Box<dyn FnMut(&str) + Send>;
/// Called when the dialog asks its parent to close it.
pub type OnClose = Box<dyn FnMut() + Send>;

/// Parent-supplied configuration and callbacks.
pub struct DialogProps {
    pub repo_name: String,
    pub on_success: OnSuccess,
    pub on_close: OnClose,
}

impl DialogProps {
    pub fn new(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            on_success: Box::new(|_| {}),
            on_close: Box::new(|| {}),
        }
    }

    pub fn with_on_success(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_success = Box::new(f);
        self
    }

    pub fn with_on_close(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Box::new(f);
        self
    }
}

impl fmt::Debug for DialogProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogProps")
            .field("repo_name", &self.repo_name)
            .finish_non_exhaustive()
    }
}

/// Device-authorization dialog for one Git provider.
///
/// Visibility is owned by the parent and pushed in with [`set_open`]. Each
/// false→true transition starts a new cycle: one device-code request, then a
/// [`PollingView`] for the code it returns. Results from earlier cycles or
/// superseded codes are dropped.
///
/// [`set_open`]: DeviceAuthDialog::set_open
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use gitauth::auth::{FileTokenStore, GitProviderName};
/// use gitauth::auth::providers::GitHubDeviceAuth;
/// use gitauth::dialog::{DeviceAuthDialog, DialogProps};
///
/// # async fn example() {
/// let mut dialog = DeviceAuthDialog::new(
///     Arc::new(GitHubDeviceAuth::new("client-id")),
///     Arc::new(FileTokenStore::new_default()),
///     GitProviderName::GitHub,
///     DialogProps::new("podinfo").with_on_success(|token| println!("got {token}")),
/// );
/// dialog.set_open(true);
/// while dialog.process_next().await {
///     println!("{}", dialog.view());
/// }
/// # }
/// ```
pub struct DeviceAuthDialog {
    backend: Arc<dyn DeviceAuthBackend>,
    store: Arc<dyn TokenStore>,
    provider: GitProviderName,
    props: DialogProps,
    open: bool,
    cycle: u64,
    code_request: Option<DropGuard>,
    code_loading: bool,
    code: Option<DeviceCodeResponse>,
    polling: Option<PollingView>,
    error: Option<DialogError>,
    events_tx: mpsc::UnboundedSender<DialogEvent>,
    events_rx: mpsc::UnboundedReceiver<DialogEvent>,
}

impl DeviceAuthDialog {
    pub fn new(
        backend: Arc<dyn DeviceAuthBackend>,
        store: Arc<dyn TokenStore>,
        provider: GitProviderName,
        props: DialogProps,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            store,
            provider,
            props,
            open: false,
            cycle: 0,
            code_request: None,
            code_loading: false,
            code: None,
            polling: None,
            error: None,
            events_tx,
            events_rx,
        }
    }

    /// Apply the parent's visibility flag.
    ///
    /// Must be called from within a tokio runtime when opening.
    pub fn set_open(&mut self, open: bool) {
        if open == self.open {
            return;
        }
        self.open = open;
        // Tear down before anything new starts so a superseded poll cannot
        // report into the next cycle.
        self.polling = None;
        self.code_request = None;
        if open {
            self.cycle += 1;
            self.error = None;
            self.code_loading = true;
            tracing::debug!(cycle = self.cycle, repo = %self.props.repo_name, "dialog opened");
            self.request_device_code();
        } else {
            self.code_loading = false;
            tracing::debug!(cycle = self.cycle, "dialog closed");
        }
    }

    fn request_device_code(&mut self) {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        let cycle = self.cycle;

        tokio::spawn(async move {
            let request = AssertUnwindSafe(backend.request_device_code()).catch_unwind();
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                outcome = request => {
                    Some(outcome.unwrap_or_else(|panic| Err(backend_panicked(panic))))
                }
            };
            match result {
                Some(result) if !token.is_cancelled() => {
                    let _ = events.send(DialogEvent::DeviceCodeSettled { cycle, result });
                }
                _ => tracing::debug!(cycle, "device code request cancelled"),
            }
        });

        self.code_request = Some(cancel.drop_guard());
    }

    /// Wait for the next event from a spawned operation.
    pub async fn next_event(&mut self) -> Option<DialogEvent> {
        self.events_rx.recv().await
    }

    /// Wait for one event and apply it. Returns `false` if the channel closed.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply every event already queued without waiting. Returns how many.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    pub fn handle_event(&mut self, event: DialogEvent) {
        match event {
            DialogEvent::DeviceCodeSettled { cycle, result } => {
                if !self.open || cycle != self.cycle {
                    tracing::debug!(cycle, current = self.cycle, "discarding stale device code");
                    return;
                }
                if let Some(guard) = self.code_request.take() {
                    let _ = guard.disarm();
                }
                self.code_loading = false;
                match result {
                    Ok(code) => self.mount_polling(code),
                    Err(err) => {
                        tracing::warn!(cycle, error = %err, "device code request failed");
                        self.error = Some(DialogError::DeviceCode(err));
                    }
                }
            }
            DialogEvent::PollSettled { code_id, result } => {
                let Some(view) = self.polling.as_mut().filter(|view| view.accepts(code_id)) else {
                    tracing::debug!(%code_id, "discarding stale authorization result");
                    return;
                };
                view.settle();
                match result {
                    Ok(auth) => self.complete(auth),
                    Err(err) => {
                        tracing::debug!(%code_id, error = %err, "authorization failed");
                        self.error = Some(DialogError::Authorization(err));
                    }
                }
            }
        }
    }

    fn mount_polling(&mut self, code: DeviceCodeResponse) {
        self.polling = None;
        self.polling = Some(PollingView::mount(
            code.clone(),
            self.backend.as_ref(),
            self.events_tx.clone(),
        ));
        self.code = Some(code);
    }

    fn complete(&mut self, auth: AuthResult) {
        let provider = self.provider.as_str();
        let access_token = auth.access_token.clone();
        if let Err(err) = self.store.save(provider, &auth.into_token()) {
            tracing::warn!(provider, error = %err, "failed to store provider token");
        }
        (self.props.on_success)(&access_token);
        (self.props.on_close)();
    }

    /// Clear the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_code_loading(&self) -> bool {
        self.code_loading
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(PollingView::is_loading)
    }

    pub fn error(&self) -> Option<&DialogError> {
        self.error.as_ref()
    }

    /// Last device code received, kept across close until the next arrives.
    pub fn device_code(&self) -> Option<&DeviceCodeResponse> {
        self.code.as_ref()
    }

    pub fn view(&self) -> DialogView {
        if !self.open {
            return DialogView::hidden();
        }
        let provider = self.provider;
        let body = match (&self.polling, self.code_loading) {
            (_, true) => DialogBody::Spinner,
            (Some(view), false) => view.body(provider),
            (None, false) => DialogBody::Empty,
        };
        DialogView {
            open: true,
            title: format!("Authenticate with {provider}"),
            description: format!(
                "gitauth needs to authenticate with the Git Provider for the {} repo",
                self.props.repo_name
            ),
            instructions: format!(
                "Paste this code into the {provider} Device Activation field to grant gitauth temporary access:"
            ),
            error: self.error.as_ref().map(ErrorBanner::from),
            body,
        }
    }
}

impl fmt::Debug for DeviceAuthDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAuthDialog")
            .field("provider", &self.provider)
            .field("props", &self.props)
            .field("open", &self.open)
            .field("cycle", &self.cycle)
            .field("code_loading", &self.code_loading)
            .field("polling", &self.polling)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
