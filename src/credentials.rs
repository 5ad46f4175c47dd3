//! API key handling for the image service.
//!
//! The key is looked up from the environment (after loading `.env`) and can
//! be replaced at runtime from the key gate screen.

use std::sync::RwLock;

/// Primary environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Fallback variable name.
pub const API_KEY_ENV: &str = "API_KEY";

/// Host-side credential check and picker.
pub trait CredentialProvider: Send + Sync {
    fn has_credential(&self) -> bool;

    /// Let the host pick or refresh a credential. Never fails; the next
    /// generation call reports whether the choice was usable.
    fn open_picker(&self);
}

/// Shared, replaceable API key.
#[derive(Debug, Default)]
pub struct ApiKeyStore {
    key: RwLock<Option<String>>,
}

impl ApiKeyStore {
    /// Create a store holding `key`. Blank keys count as missing.
    pub fn with_key(key: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(key);
        store
    }

    /// Create a store from `GEMINI_API_KEY` or `API_KEY`.
    pub fn from_env() -> Self {
        let store = Self::default();
        store.reload_from_env();
        store
    }

    /// Current key, if any.
    pub fn get(&self) -> Option<String> {
        match self.key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, key: impl Into<String>) {
        let key = key.into();
        let key = key.trim();
        let value = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
        match self.key.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    pub fn clear(&self) {
        self.set("");
    }

    /// Re-read the key from `.env` and the environment.
    ///
    /// Keeps the current key when the environment has none.
    pub fn reload_from_env(&self) {
        // dotenv returns Err if .env doesn't exist, which is fine
        let _ = dotenv::dotenv();

        let from_env = [GEMINI_API_KEY_ENV, API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        match from_env {
            Some(key) => {
                self.set(key);
                log::debug!("API key loaded from environment");
            }
            None => log::debug!(
                "Neither {} nor {} is set",
                GEMINI_API_KEY_ENV,
                API_KEY_ENV
            ),
        }
    }
}

impl CredentialProvider for ApiKeyStore {
    fn has_credential(&self) -> bool {
        self.get().is_some()
    }

    fn open_picker(&self) {
        self.reload_from_env();
    }
}
