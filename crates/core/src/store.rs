//! Durable token storage backends

use crate::error::CoreResult;
use crate::tokens::TokenPair;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key for the persisted access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the persisted refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Durable storage for the token pair.
///
/// The stored format keeps the original key/value contract: both keys are
/// written on every save (empty string when no pair is held), and a stored
/// empty string reads back as absent.
pub trait TokenStore: Send + Sync {
    /// Read the persisted pair. Only a pair with both halves non-empty
    /// counts as live.
    fn load(&self) -> CoreResult<Option<TokenPair>>;

    /// Persist the pair, writing empty strings when none is held
    fn save(&self, tokens: Option<&TokenPair>) -> CoreResult<()>;

    /// Remove both keys
    fn clear(&self) -> CoreResult<()>;
}

/// In-memory key/value store with web-storage semantics, for tests and
/// short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a raw stored value
    pub fn get(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .expect("Failed to acquire token store lock")
            .get(key)
            .cloned()
    }

    /// Write a raw stored value
    pub fn insert(&self, key: &str, value: &str) {
        self.items
            .lock()
            .expect("Failed to acquire token store lock")
            .insert(key.to_string(), value.to_string());
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> CoreResult<Option<TokenPair>> {
        let items = self
            .items
            .lock()
            .expect("Failed to acquire token store lock");
        Ok(TokenPair::from_stored(
            items.get(ACCESS_TOKEN_KEY).cloned(),
            items.get(REFRESH_TOKEN_KEY).cloned(),
        ))
    }

    fn save(&self, tokens: Option<&TokenPair>) -> CoreResult<()> {
        let mut items = self
            .items
            .lock()
            .expect("Failed to acquire token store lock");
        let (access, refresh) = match tokens {
            Some(pair) => (pair.access_token.as_str(), pair.refresh_token.as_str()),
            None => ("", ""),
        };
        items.insert(ACCESS_TOKEN_KEY.to_string(), access.to_string());
        items.insert(REFRESH_TOKEN_KEY.to_string(), refresh.to_string());
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        let mut items = self
            .items
            .lock()
            .expect("Failed to acquire token store lock");
        items.remove(ACCESS_TOKEN_KEY);
        items.remove(REFRESH_TOKEN_KEY);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct StoredTokens {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    refresh_token: String,
}

/// File-backed token store: one JSON document holding the two storage keys.
///
/// Native only; wasm builds persist through browser storage instead.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileTokenStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileTokenStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the platform's data directory for this application
    pub fn default_location() -> CoreResult<Self> {
        let dirs = directories::ProjectDirs::from("", "", "authway")
            .ok_or_else(|| crate::CoreError::invalid_config("no home directory available"))?;
        Ok(Self::new(dirs.data_dir().join("tokens.json")))
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenStore for FileTokenStore {
    fn load(&self) -> CoreResult<Option<TokenPair>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let stored: StoredTokens = serde_json::from_str(&raw)?;
        Ok(TokenPair::from_stored(
            Some(stored.access_token),
            Some(stored.refresh_token),
        ))
    }

    fn save(&self, tokens: Option<&TokenPair>) -> CoreResult<()> {
        let stored = match tokens {
            Some(pair) => StoredTokens {
                access_token: pair.access_token.clone(),
                refresh_token: pair.refresh_token.clone(),
            },
            None => StoredTokens::default(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// Mock implementation for testing
#[cfg(any(test, feature = "tests"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub TokenStore {}

        impl TokenStore for TokenStore {
            fn load(&self) -> CoreResult<Option<TokenPair>>;
            fn save<'a>(&self, tokens: Option<&'a TokenPair>) -> CoreResult<()>;
            fn clear(&self) -> CoreResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_a_pair() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        let pair = TokenPair::new("AT1", "RT1");
        store.save(Some(&pair)).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("AT1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("RT1"));
        assert_eq!(store.load().unwrap(), Some(pair));
    }

    #[test]
    fn memory_store_saves_empty_strings_for_no_pair() {
        let store = MemoryTokenStore::new();
        store.save(None).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some(""));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some(""));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_treats_stored_empty_string_as_absent() {
        let store = MemoryTokenStore::new();
        store.insert(ACCESS_TOKEN_KEY, "AT1");
        store.insert(REFRESH_TOKEN_KEY, "");
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_clear_removes_both_keys() {
        let store = MemoryTokenStore::new();
        store.save(Some(&TokenPair::new("AT1", "RT1"))).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_store_round_trips_a_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("tokens.json"));
        assert_eq!(store.load().unwrap(), None);

        let pair = TokenPair::new("AT1", "RT1");
        store.save(Some(&pair)).unwrap();
        assert_eq!(store.load().unwrap(), Some(pair));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_store_save_none_leaves_no_live_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        store.save(None).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        store.clear().unwrap();
        store.clear().unwrap();
    }
}
