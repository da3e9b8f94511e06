//! Authway core types and utilities

pub mod error;
pub mod store;
pub mod tokens;

pub use error::{CoreError, CoreResult};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileTokenStore;
pub use store::{MemoryTokenStore, TokenStore};
pub use tokens::{TokenCell, TokenPair};
