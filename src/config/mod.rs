//! Configuration system (layered: code > env > config file).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::store::default_gitauth_dir;
use crate::auth::{FileTokenStore, TokenStoreConfig};
use crate::error::{GitAuthError, Result};

pub const DEFAULT_GITHUB_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
pub const DEFAULT_GITHUB_ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_GITHUB_SCOPE: &str = "repo";

/// GitHub OAuth app settings for the device flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub client_id: String,
    pub scope: String,
    pub device_code_url: String,
    pub access_token_url: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            scope: DEFAULT_GITHUB_SCOPE.to_string(),
            device_code_url: DEFAULT_GITHUB_DEVICE_CODE_URL.to_string(),
            access_token_url: DEFAULT_GITHUB_ACCESS_TOKEN_URL.to_string(),
        }
    }
}

/// Layered configuration for gitauth.
///
/// Resolution order:
/// 1. Values set in code
/// 2. `GITAUTH_*` environment variables (and `.env`)
/// 3. `config.toml` in the gitauth directory
/// 4. Built-in defaults
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GitAuthConfig {
    pub github: GitHubSettings,
    pub token_dir: Option<PathBuf>,
}

impl GitAuthConfig {
    /// Default config file path (~/.gitauth/config.toml).
    pub fn default_config_path() -> PathBuf {
        default_gitauth_dir().join("config.toml")
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(GitAuthError::Io(err)),
        };
        Ok(toml::from_str(&raw)?)
    }

    /// Load the default config file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::load_from_path(Self::default_config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults plus environment overrides, ignoring any config file.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `GITAUTH_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("GITAUTH_GITHUB_CLIENT_ID") {
            self.github.client_id = v;
        }
        if let Some(v) = non_empty("GITAUTH_GITHUB_SCOPE") {
            self.github.scope = v;
        }
        if let Some(v) = non_empty("GITAUTH_GITHUB_DEVICE_CODE_URL") {
            self.github.device_code_url = v;
        }
        if let Some(v) = non_empty("GITAUTH_GITHUB_ACCESS_TOKEN_URL") {
            self.github.access_token_url = v;
        }
        if let Some(v) = non_empty("GITAUTH_TOKEN_DIR") {
            self.token_dir = Some(PathBuf::from(v));
        }
    }

    pub fn with_github_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.github.client_id = client_id.into();
        self
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    pub fn token_dir(&self) -> PathBuf {
        self.token_dir.clone().unwrap_or_else(default_gitauth_dir)
    }

    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(TokenStoreConfig::new(self.token_dir()))
    }

    /// Fail early when the GitHub device flow cannot run.
    pub fn validate_github(&self) -> Result<()> {
        if self.github.client_id.trim().is_empty() {
            return Err(GitAuthError::Configuration(
                "GitHub OAuth client id is not set (GITAUTH_GITHUB_CLIENT_ID or [github].client_id)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
