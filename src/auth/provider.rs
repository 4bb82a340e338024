//! Identity provider abstraction.
//!
//! Credentials and tokens live with the external identity service; the graph
//! only ever stores profile data. This trait is the whole surface the rest of
//! the crate may touch, so handlers and services can be tested against an
//! in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::validate::ValidationError;

/// Errors from the identity boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email is already registered")]
    EmailExists,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password is too weak")]
    WeakPassword,

    /// Deliberately the same message for a wrong password and an unknown
    /// email, so login responses do not reveal which emails are registered.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Transient upstream failure (network error or 5xx); safe to retry.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuthError {
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Unavailable(_))
    }
}

/// An account as known to the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// Claims extracted from a verified ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub uid: String,
    pub email: Option<String>,
    /// Unix timestamp after which the token is no longer valid
    pub expires_at: i64,
}

/// An authenticated session returned from a password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Lifetime of `id_token` in seconds
    pub expires_in: i64,
}

/// Abstract interface to the external identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its canonical record. The uid assigned
    /// here becomes the graph node key.
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError>;

    /// Look up an account by email, or None when absent
    async fn get_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;

    /// Verify email/password credentials and open a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Validate an ID token and return its claims
    async fn verify_token(&self, id_token: &str) -> Result<TokenClaims, AuthError>;

    /// Mint a custom sign-in token for the given uid. `claims` is embedded
    /// in the token verbatim, so clients can read attributes like the user's
    /// role without a second lookup.
    async fn create_custom_token(
        &self,
        uid: &str,
        claims: &Map<String, Value>,
    ) -> Result<String, AuthError>;

    /// Permanently delete an account. Used to roll back a half-finished
    /// registration when the graph write fails.
    async fn delete_user(&self, uid: &str) -> Result<(), AuthError>;
}
