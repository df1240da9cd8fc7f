//! Cancellable handle for an in-flight authorization poll.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::error::AuthError;
use super::token::AuthResult;

/// Boxed result future carried by a [`PollHandle`].
pub type PollFuture = BoxFuture<'static, Result<AuthResult, AuthError>>;

/// Handle for an in-flight authorization-status poll.
///
/// Cancelling the handle makes the eventual settlement of its result a no-op
/// for whoever awaits it through [`PollHandle::wait`]. The underlying network
/// call is not required to stop; implementations that observe the token
/// (see [`PollHandle::spawn_with`]) usually do.
pub struct PollHandle {
    cancel: CancellationToken,
    result: PollFuture,
}

impl PollHandle {
    pub fn new(
        cancel: CancellationToken,
        result: impl Future<Output = Result<AuthResult, AuthError>> + Send + 'static,
    ) -> Self {
        Self {
            cancel,
            result: result.boxed(),
        }
    }

    /// Build a handle whose future is given the handle's own cancellation token.
    pub fn spawn_with<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<AuthResult, AuthError>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let result = f(cancel.clone());
        Self::new(cancel, result)
    }

    /// A handle that settles immediately with `result`.
    pub fn ready(result: Result<AuthResult, AuthError>) -> Self {
        Self::new(CancellationToken::new(), futures::future::ready(result))
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Guard that cancels the handle when dropped.
    pub fn drop_guard(&self) -> DropGuard {
        self.cancel.clone().drop_guard()
    }

    pub fn into_parts(self) -> (CancellationToken, PollFuture) {
        (self.cancel, self.result)
    }

    /// Wait for the result, or `None` once cancelled.
    ///
    /// Cancellation wins over a result that is ready at the same time.
    pub async fn wait(self) -> Option<Result<AuthResult, AuthError>> {
        let (cancel, result) = self.into_parts();
        if cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = result => {
                if cancel.is_cancelled() {
                    None
                } else {
                    Some(outcome)
                }
            }
        }
    }
}

impl fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("result", &"..")
            .finish()
    }
}
