//! Authway auth session layer
//!
//! Wraps the request layer with the auth service's endpoints, owns the
//! current access/refresh token pair, and persists it across restarts
//! through a pluggable [`TokenStore`](authway_core::TokenStore).

pub mod session;
pub mod types;

pub use session::AuthSession;
pub use types::{LoginOutcome, RegisterRequest};
