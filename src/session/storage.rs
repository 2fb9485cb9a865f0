//! Durable key-value storage for session state
//!
//! Mirrors the browser client's localStorage contract: string keys namespaced
//! with the application prefix, synchronous access, and a single logical
//! writer (the session store). Write failures are logged and swallowed so
//! that local teardown always succeeds.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Result, StorageError};

/// Storage keys, namespaced under the application prefix
pub mod keys {
    /// Persisted user identity (JSON)
    pub const USER: &str = "clinagenda_user";
    /// Persisted bearer token
    pub const TOKEN: &str = "clinagenda_token";
    /// Persisted token expiry (RFC 3339)
    pub const TOKEN_EXPIRES: &str = "clinagenda_token_expires";
    /// Path to return to after the next successful login
    pub const REDIRECT_AFTER_LOGIN: &str = "clinagenda_redirect_after_login";
    /// Remember-me marker set by the login form
    pub const REMEMBER: &str = "clinagenda_remember";
}

/// Synchronous key-value store for session state
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, used by tests and short-lived embedders
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// File-backed storage holding the key-value map as YAML.
///
/// Entries are kept in memory and flushed to disk on every mutation. The
/// store file is created with mode 600 on Unix since it holds the bearer
/// token.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Get the default store file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StorageError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".clinagenda").join("session.yaml"))
    }

    /// Open the store at the default path, creating an empty one if absent
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open the store at a specific path, creating an empty one if absent
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents).map_err(StorageError::from)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(entries).map_err(|e| StorageError::SaveError(e.to_string()))?;

        std::fs::write(&self.path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            log::warn!("Failed to persist session store: {}", e);
        }
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            if let Err(e) = self.flush(&entries) {
                log::warn!("Failed to persist session store: {}", e);
            }
        }
    }
}
