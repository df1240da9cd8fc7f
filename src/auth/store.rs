use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::Token;

/// Storage abstraction for persisted provider tokens.
pub trait TokenStore: Send + Sync {
    fn load(&self, provider: &str) -> Result<Option<Token>, AuthError>;
    fn save(&self, provider: &str, token: &Token) -> Result<(), AuthError>;
    fn clear(&self, provider: &str) -> Result<(), AuthError>;
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }
}

/// File-backed token store, one TOML file per provider.
///
/// # Example
/// ```no_run
/// use gitauth::auth::{FileTokenStore, Token, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let token = Token {
///     access_token: "gho_abc".to_string(),
///     scopes: None,
///     obtained_at: None,
/// };
/// store.save("GitHub", &token)?;
/// # Ok::<(), gitauth::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self {
            base_dir: config.base_dir,
        }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_gitauth_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn token_path(&self, provider: &str) -> PathBuf {
        self.base_dir
            .join("tokens")
            .join(format!("{}.toml", normalize_label(provider)))
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, provider: &str) -> Result<Option<Token>, AuthError> {
        let path = self.token_path(provider);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        if file.version != TOKEN_FILE_VERSION {
            return Err(AuthError::Configuration(format!(
                "Unsupported token file version {} at {}",
                file.version,
                path.display()
            )));
        }
        Ok(Some(file.token))
    }

    fn save(&self, provider: &str, token: &Token) -> Result<(), AuthError> {
        let path = self.token_path(provider);
        Self::ensure_parent(&path)?;
        let file = TokenFile {
            version: TOKEN_FILE_VERSION,
            provider: provider.to_string(),
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        tracing::debug!(provider, path = %path.display(), "provider token saved");
        Ok(())
    }

    fn clear(&self, provider: &str) -> Result<(), AuthError> {
        let path = self.token_path(provider);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

const TOKEN_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    provider: String,
    token: Token,
    saved_at: DateTime<Utc>,
}

pub(crate) fn default_gitauth_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".gitauth"))
        .unwrap_or_else(|| PathBuf::from(".gitauth"))
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '-' {
            out.push(lower);
        } else {
            out.push('-');
        }
    }
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(TokenStoreConfig::new(dir.path().to_path_buf()));
        (dir, store)
    }

    fn token(access: &str) -> Token {
        Token {
            access_token: access.to_string(),
            scopes: Some(vec!["repo".to_string()]),
            obtained_at: None,
        }
    }

    #[test]
    fn token_round_trip_works() {
        let (_dir, store) = temp_store();
        store.save("GitHub", &token("gho_1")).unwrap();
        let loaded = store.load("GitHub").unwrap().unwrap();
        assert_eq!(loaded.access_token, "gho_1");
        assert_eq!(loaded.scopes, Some(vec!["repo".to_string()]));
    }

    #[test]
    fn provider_names_are_case_insensitive_on_disk() {
        let (_dir, store) = temp_store();
        store.save("GitHub", &token("gho_1")).unwrap();
        assert!(store.load("github").unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = temp_store();
        store.save("GitHub", &token("gho_1")).unwrap();
        let path = dir.path().join("tokens").join("github.toml");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn clear_removes_token() {
        let (_dir, store) = temp_store();
        store.save("GitHub", &token("gho_1")).unwrap();
        store.clear("GitHub").unwrap();
        assert!(store.load("GitHub").unwrap().is_none());
    }

    #[test]
    fn clear_missing_token_is_ok() {
        let (_dir, store) = temp_store();
        store.clear("GitLab").unwrap();
    }

    #[test]
    fn unknown_version_is_rejected() {
        let (dir, store) = temp_store();
        let path = dir.path().join("tokens").join("github.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "version = 9\nprovider = \"GitHub\"\nsaved_at = \"2026-01-01T00:00:00Z\"\n\n[token]\naccess_token = \"x\"\n",
        )
        .unwrap();
        assert!(matches!(
            store.load("GitHub"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn normalize_label_replaces_separators() {
        assert_eq!(normalize_label("Git Hub/Enterprise"), "git-hub-enterprise");
        assert_eq!(normalize_label("  "), "default");
    }
}
