#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use gitauth::auth::{
    AuthError, AuthResult, DeviceAuthBackend, DeviceCodeResponse, GitProviderName, PollHandle,
    Token, TokenStore,
};
use gitauth::dialog::{DeviceAuthDialog, DialogProps};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Ordered record of side effects across store and callbacks.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().expect("log lock poisoned").clone()
}

#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<String, Token>>,
    log: Option<CallLog>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            log: Some(log),
        }
    }

    pub fn get(&self, provider: &str) -> Option<Token> {
        self.tokens
            .lock()
            .expect("store lock poisoned")
            .get(provider)
            .cloned()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self, provider: &str) -> Result<Option<Token>, AuthError> {
        Ok(self.get(provider))
    }

    fn save(&self, provider: &str, token: &Token) -> Result<(), AuthError> {
        if let Some(log) = &self.log {
            log.lock()
                .expect("log lock poisoned")
                .push(format!("store:{provider}:{}", token.access_token));
        }
        self.tokens
            .lock()
            .expect("store lock poisoned")
            .insert(provider.to_string(), token.clone());
        Ok(())
    }

    fn clear(&self, provider: &str) -> Result<(), AuthError> {
        self.tokens
            .lock()
            .expect("store lock poisoned")
            .remove(provider);
        Ok(())
    }
}

/// Store whose writes always fail.
pub struct FailingTokenStore;

impl TokenStore for FailingTokenStore {
    fn load(&self, _provider: &str) -> Result<Option<Token>, AuthError> {
        Ok(None)
    }

    fn save(&self, _provider: &str, _token: &Token) -> Result<(), AuthError> {
        Err(AuthError::Io("disk full".to_string()))
    }

    fn clear(&self, _provider: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

struct PollSlot {
    code: DeviceCodeResponse,
    cancel: CancellationToken,
    tx: Option<oneshot::Sender<Result<AuthResult, AuthError>>>,
}

type CodeSender = oneshot::Sender<Result<DeviceCodeResponse, AuthError>>;

/// Backend whose every operation waits until the test resolves it.
#[derive(Default)]
pub struct ScriptedBackend {
    code_requests: Mutex<Vec<Option<CodeSender>>>,
    polls: Mutex<Vec<PollSlot>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code_request_count(&self) -> usize {
        self.code_requests.lock().expect("lock").len()
    }

    /// Yield until at least `n` device-code requests have been issued.
    pub async fn wait_for_code_requests(&self, n: usize) {
        for _ in 0..1_000 {
            if self.code_request_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!(
            "expected {n} device code requests, saw {}",
            self.code_request_count()
        );
    }

    /// Resolve device-code request `index`. Returns `false` if its caller is gone.
    pub fn respond_code(&self, index: usize, result: Result<DeviceCodeResponse, AuthError>) -> bool {
        let tx = self
            .code_requests
            .lock()
            .expect("lock")
            .get_mut(index)
            .and_then(Option::take);
        match tx {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    pub fn poll_count(&self) -> usize {
        self.polls.lock().expect("lock").len()
    }

    pub fn poll_code(&self, index: usize) -> DeviceCodeResponse {
        self.polls.lock().expect("lock")[index].code.clone()
    }

    pub fn poll_cancelled(&self, index: usize) -> bool {
        self.polls.lock().expect("lock")[index].cancel.is_cancelled()
    }

    /// Resolve poll `index`. Returns `false` if nobody is listening any more.
    pub fn resolve_poll(&self, index: usize, result: Result<AuthResult, AuthError>) -> bool {
        let tx = self.polls.lock().expect("lock")[index].tx.take();
        match tx {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl DeviceAuthBackend for ScriptedBackend {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        let (tx, rx) = oneshot::channel();
        self.code_requests.lock().expect("lock").push(Some(tx));
        rx.await.unwrap_or(Err(AuthError::Cancelled))
    }

    fn poll_authorization_status(&self, code: &DeviceCodeResponse) -> PollHandle {
        let (tx, rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        self.polls.lock().expect("lock").push(PollSlot {
            code: code.clone(),
            cancel: cancel.clone(),
            tx: Some(tx),
        });
        PollHandle::new(cancel, async move {
            rx.await.unwrap_or(Err(AuthError::Cancelled))
        })
    }
}

/// Backend whose operations panic, either on the code request or the poll.
pub struct PanickingBackend {
    pub code: Option<DeviceCodeResponse>,
}

#[async_trait]
impl DeviceAuthBackend for PanickingBackend {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        match &self.code {
            Some(code) => Ok(code.clone()),
            None => panic!("device code endpoint exploded"),
        }
    }

    fn poll_authorization_status(&self, _code: &DeviceCodeResponse) -> PollHandle {
        PollHandle::new(CancellationToken::new(), exploding_poll())
    }
}

async fn exploding_poll() -> Result<AuthResult, AuthError> {
    panic!("token endpoint exploded")
}

pub fn device_code(user_code: &str) -> DeviceCodeResponse {
    DeviceCodeResponse::new(
        user_code,
        "https://github.com/login/device",
        format!("device-{user_code}"),
        5,
        Utc::now() + Duration::minutes(15),
    )
}

/// Let spawned tasks run for a while.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

/// Dialog wired to a scripted backend, a logging store and logging callbacks.
pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<InMemoryTokenStore>,
    pub log: CallLog,
    pub dialog: DeviceAuthDialog,
}

impl Harness {
    pub fn new(repo_name: &str) -> Self {
        let backend = Arc::new(ScriptedBackend::new());
        let log = call_log();
        let store = Arc::new(InMemoryTokenStore::with_log(Arc::clone(&log)));
        let dialog = DeviceAuthDialog::new(
            backend.clone(),
            store.clone(),
            GitProviderName::GitHub,
            logging_props(repo_name, &log),
        );
        Self {
            backend,
            store,
            log,
            dialog,
        }
    }

    /// Open the dialog and deliver `code` for the resulting request.
    pub async fn open_with_code(&mut self, code: DeviceCodeResponse) {
        let before = self.backend.code_request_count();
        self.dialog.set_open(true);
        self.backend.wait_for_code_requests(before + 1).await;
        assert!(self.backend.respond_code(before, Ok(code)));
        assert!(self.dialog.process_next().await);
    }
}

pub fn logging_props(repo_name: &str, log: &CallLog) -> DialogProps {
    let success_log = Arc::clone(log);
    let close_log = Arc::clone(log);
    DialogProps::new(repo_name)
        .with_on_success(move |token| {
            success_log
                .lock()
                .expect("log lock poisoned")
                .push(format!("success:{token}"));
        })
        .with_on_close(move || {
            close_log
                .lock()
                .expect("log lock poisoned")
                .push("close".to_string());
        })
}
