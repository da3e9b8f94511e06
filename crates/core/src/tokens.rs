//! Access/refresh token pair and the shared cell that holds it

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// An access/refresh credential pair.
///
/// Both halves travel together: a session either holds a complete pair or
/// nothing at all. Absence is modeled as `Option<TokenPair>`, never as empty
/// strings held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential attached to authenticated requests
    pub access_token: String,
    /// Longer-lived credential exchanged for a new access token
    pub refresh_token: String,
}

impl TokenPair {
    /// Create a new token pair
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Build a pair from values read back from storage.
    ///
    /// Stored empty strings count as absent, and only a pair with both halves
    /// live is returned.
    pub fn from_stored(access: Option<String>, refresh: Option<String>) -> Option<Self> {
        match (access, refresh) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(Self {
                    access_token: access,
                    refresh_token: refresh,
                })
            }
            _ => None,
        }
    }
}

/// Shared handle to the current token pair.
///
/// The session layer performs all writes; the request layer holds a clone and
/// only reads the access token when attaching the bearer header.
#[derive(Clone, Debug, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<TokenPair>>>,
}

impl TokenCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the current pair, if one is held
    pub fn get(&self) -> Option<TokenPair> {
        self.inner
            .read()
            .expect("Failed to acquire token cell lock")
            .clone()
    }

    /// Get a copy of the current access token, if one is held
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("Failed to acquire token cell lock")
            .as_ref()
            .map(|pair| pair.access_token.clone())
    }

    /// Replace the current pair
    pub fn set(&self, tokens: TokenPair) {
        *self
            .inner
            .write()
            .expect("Failed to acquire token cell lock") = Some(tokens);
    }

    /// Drop the current pair
    pub fn clear(&self) {
        *self
            .inner
            .write()
            .expect("Failed to acquire token cell lock") = None;
    }

    /// Whether a pair is currently held
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .expect("Failed to acquire token cell lock")
            .is_some()
    }
}
