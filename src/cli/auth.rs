//! CLI handlers for login, status, and logout.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::auth::providers::GitHubDeviceAuth;
use crate::auth::{GitProviderName, TokenStore};
use crate::config::GitAuthConfig;
use crate::dialog::{DeviceAuthDialog, DialogProps};
use crate::error::{GitAuthError, Result};

use super::LoginArgs;

fn parse_provider(raw: &str) -> Result<GitProviderName> {
    GitProviderName::parse(raw).ok_or_else(|| {
        GitAuthError::InvalidArgument(format!(
            "unknown provider: {raw} (supported: github, gitlab)"
        ))
    })
}

/// Handle `gitauth login --repo <name>`.
///
/// Runs the dialog until the token arrives or the user quits. After a
/// failure, Enter reopens the dialog (a fresh device code) and `q` quits.
pub async fn handle_login(args: &LoginArgs, config: &GitAuthConfig) -> Result<()> {
    let provider = parse_provider(&args.provider)?;
    if provider != GitProviderName::GitHub {
        return Err(GitAuthError::InvalidArgument(format!(
            "device authorization is not available for {provider}"
        )));
    }
    config.validate_github()?;

    let backend = Arc::new(GitHubDeviceAuth::from_settings(&config.github));
    let store = Arc::new(config.token_store());

    let (close_tx, mut close_rx) = mpsc::unbounded_channel::<()>();
    let received = Arc::new(Mutex::new(None::<String>));
    let slot = Arc::clone(&received);
    let props = DialogProps::new(args.repo.clone())
        .with_on_success(move |token| {
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(token.to_string());
            }
        })
        .with_on_close(move || {
            let _ = close_tx.send(());
        });

    let mut dialog = DeviceAuthDialog::new(backend, store, provider, props);
    dialog.set_open(true);
    print_dialog(&dialog);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                dialog.set_open(false);
                eprintln!("Cancelled.");
                break;
            }
            Some(()) = close_rx.recv() => {
                dialog.set_open(false);
                break;
            }
            line = stdin.next_line(), if dialog.error().is_some() => {
                match line? {
                    Some(input) if !input.trim().eq_ignore_ascii_case("q") => {
                        dialog.set_open(false);
                        dialog.set_open(true);
                        print_dialog(&dialog);
                    }
                    _ => {
                        dialog.set_open(false);
                        break;
                    }
                }
            }
            processed = dialog.process_next() => {
                if !processed {
                    break;
                }
                print_dialog(&dialog);
            }
        }
    }

    let token = received.lock().ok().and_then(|guard| guard.clone());
    let token = login_outcome(provider, token)?;
    println!("✅ Authenticated with {provider}; token stored.");
    if args.print_token {
        println!("{token}");
    }
    Ok(())
}

/// Token delivered by the dialog, or why the login ended without one.
fn login_outcome(provider: GitProviderName, token: Option<String>) -> Result<String> {
    token.ok_or(GitAuthError::NotAuthorized(provider))
}

fn print_dialog(dialog: &DeviceAuthDialog) {
    print!("{}", dialog.view());
    if dialog.error().is_some() {
        println!();
        println!("Press Enter to request a new code, or q to quit.");
    }
    println!();
}

/// Handle `gitauth status`.
pub async fn handle_status(config: &GitAuthConfig) -> Result<()> {
    let store = config.token_store();

    println!("🔐 Stored provider tokens ({})\n", store.base_dir().display());
    for provider in GitProviderName::ALL {
        match store.load(provider.as_str()) {
            Ok(Some(token)) => {
                let obtained = token
                    .obtained_at
                    .map(|at| format!(" (obtained {})", at.format("%Y-%m-%d %H:%M")))
                    .unwrap_or_default();
                println!("  {provider}: ✅ Token stored{obtained}");
            }
            Ok(None) => println!("  {provider}: ❌ No token"),
            Err(e) => println!("  {provider}: ⚠️  Error: {e}"),
        }
    }
    Ok(())
}

/// Handle `gitauth logout --provider <name>`.
pub async fn handle_logout(provider: &str, config: &GitAuthConfig) -> Result<()> {
    let provider = parse_provider(provider)?;
    config.token_store().clear(provider.as_str())?;
    println!("✅ Removed stored token for {provider}");
    Ok(())
}
