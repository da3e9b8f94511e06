//! Auth session: owns the token pair and the auth endpoint calls

use crate::types::{
    ForgotPasswordRequest, LoginOutcome, LoginRequest, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, TokenGrant, VerifyEmailRequest,
};
use authway_client::{ApiClient, ApiError, ApiResponse, ApiResult, Method};
use authway_core::{TokenCell, TokenPair, TokenStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Authenticated session against the auth service.
///
/// Owns the current token pair through the client's shared [`TokenCell`] and
/// persists every pair change through the injected [`TokenStore`]. Construct
/// one per logical user session; instances are cheap to clone.
#[derive(Clone)]
pub struct AuthSession {
    client: ApiClient,
    tokens: TokenCell,
    store: Arc<dyn TokenStore>,
}

impl AuthSession {
    /// Create a session, restoring any persisted token pair.
    ///
    /// A storage read failure leaves the session unauthenticated rather than
    /// failing construction.
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let tokens = client.tokens().clone();
        match store.load() {
            Ok(Some(pair)) => {
                debug!("restored persisted session");
                tokens.set(pair);
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to restore persisted tokens"),
        }
        Self {
            client,
            tokens,
            store,
        }
    }

    /// Whether a token pair is currently held
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Get a copy of the current token pair, if any
    pub fn tokens(&self) -> Option<TokenPair> {
        self.tokens.get()
    }

    /// Log in with email and password.
    ///
    /// Never returns an error: failures are folded into the outcome so the
    /// calling form only ever branches on `success`.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .client
            .public_request(Method::POST, "/login")
            .json(&body);

        match self.client.execute(req).await {
            Ok(res) => {
                if self.adopt_grant(&res) {
                    debug!("login succeeded");
                    LoginOutcome::ok()
                } else {
                    LoginOutcome::failed("Invalid credentials")
                }
            }
            Err(err) => {
                debug!(status = err.status, "login failed: {}", err.message);
                LoginOutcome::failed(err.message)
            }
        }
    }

    /// Create an account. Registration does not log the user in; errors
    /// propagate to the caller.
    pub async fn register(&self, user: &RegisterRequest) -> ApiResult<ApiResponse> {
        let req = self
            .client
            .public_request(Method::POST, "/register")
            .json(user);
        self.client.execute(req).await
    }

    /// Submit an email verification code. A response carrying an access
    /// token logs the session in exactly like [`login`](Self::login).
    pub async fn verify_email(&self, code: &str, email: &str) -> ApiResult<ApiResponse> {
        let body = VerifyEmailRequest {
            email: email.to_string(),
            token: code.to_string(),
        };
        let req = self
            .client
            .public_request(Method::POST, "/verify-email")
            .json(&body);
        let res = self.client.execute(req).await?;
        self.adopt_grant(&res);
        Ok(res)
    }

    /// Validate a verification link's token and email, passed as query
    /// parameters. Same token adoption as [`verify_email`](Self::verify_email).
    pub async fn verify_email_from_link(&self, token: &str, email: &str) -> ApiResult<ApiResponse> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("token", token)
            .append_pair("email", email)
            .finish();
        let req = self
            .client
            .public_request(Method::GET, &format!("/verify-email?{query}"));
        let res = self.client.execute(req).await?;
        self.adopt_grant(&res);
        Ok(res)
    }

    /// Exchange the refresh token for a fresh access token.
    ///
    /// Fails fast with a local 401 when no refresh token is held; no network
    /// call is made in that case. When the server omits a new refresh token,
    /// the current one is kept.
    pub async fn refresh_access_token(&self) -> ApiResult<ApiResponse> {
        let Some(current) = self.tokens.get() else {
            return Err(ApiError::new("No refresh token available", 401));
        };

        let body = RefreshRequest {
            refresh_token: current.refresh_token,
        };
        let req = self
            .client
            .public_request(Method::POST, "/refresh")
            .json(&body);
        let res = self.client.execute(req).await?;
        if self.adopt_grant(&res) {
            debug!("access token refreshed");
        }
        Ok(res)
    }

    /// Request a password-reset email. No token state changes.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<ApiResponse> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let req = self
            .client
            .public_request(Method::POST, "/forgot-password")
            .json(&body);
        self.client.execute(req).await
    }

    /// Set a new password using a reset token. Does not log the user in.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<ApiResponse> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let req = self
            .client
            .public_request(Method::POST, "/reset-password")
            .json(&body);
        self.client.execute(req).await
    }

    /// Clear the in-memory pair and wipe persisted storage. Safe to call
    /// repeatedly, including when already logged out.
    pub fn logout(&self) {
        self.tokens.clear();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted tokens");
        }
        debug!("session cleared");
    }

    /// Take tokens off a successful auth response. Returns true when an
    /// access token was present and the session is now authenticated.
    ///
    /// An access token is only ever adopted together with a refresh token:
    /// fresh from the response, or carried over from the current pair when
    /// the server rotates only the access half.
    fn adopt_grant(&self, res: &ApiResponse) -> bool {
        let grant: TokenGrant = serde_json::from_value(res.data.clone()).unwrap_or_default();

        let Some(access) = grant.access_token.filter(|t| !t.is_empty()) else {
            return false;
        };
        let refresh = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.tokens.get().map(|pair| pair.refresh_token));
        let Some(refresh) = refresh else {
            warn!("auth response carried an access token but no refresh token; not adopting");
            return false;
        };

        let pair = TokenPair::new(access, refresh);
        self.tokens.set(pair.clone());
        if let Err(err) = self.store.save(Some(&pair)) {
            warn!(error = %err, "failed to persist tokens");
        }
        true
    }
}
