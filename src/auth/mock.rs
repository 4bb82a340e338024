//! In-memory mock identity provider for testing.
//!
//! Assigns deterministic uids (`fb-uid-1`, `fb-uid-2`, ...) and accepts
//! ID tokens of the form `id-token-<uid>`.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::auth::provider::{
    AuthError, AuthSession, AuthUser, IdentityProvider, TokenClaims,
};

struct MockAccount {
    user: AuthUser,
    password: String,
}

/// In-memory mock implementation of IdentityProvider for testing.
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<String, MockAccount>>,
    /// Developer claims passed to the last `create_custom_token` per uid
    custom_claims: RwLock<HashMap<String, Map<String, Value>>>,
    counter: AtomicU64,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            custom_claims: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// The uid the next `create_user` call will assign.
    pub fn next_uid(&self) -> String {
        format!("fb-uid-{}", self.counter.load(Ordering::SeqCst) + 1)
    }

    /// A valid ID token for the given uid.
    pub fn id_token_for(&self, uid: &str) -> String {
        format!("id-token-{}", uid)
    }

    pub async fn has_user(&self, uid: &str) -> bool {
        self.accounts.read().await.contains_key(uid)
    }

    pub async fn user_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Claims embedded in the most recent custom token minted for `uid`
    pub async fn custom_claims_for(&self, uid: &str) -> Option<Map<String, Value>> {
        self.custom_claims.read().await.get(uid).cloned()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.user.email == email) {
            return Err(AuthError::EmailExists);
        }
        let uid = format!("fb-uid-{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1);
        let user = AuthUser {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            email_verified: false,
            disabled: false,
        };
        accounts.insert(
            uid,
            MockAccount {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.user.email == email)
            .map(|a| a.user.clone()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .values()
            .find(|a| a.user.email == email)
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(AuthSession {
            uid: account.user.uid.clone(),
            email: account.user.email.clone(),
            id_token: self.id_token_for(&account.user.uid),
            refresh_token: format!("refresh-{}", account.user.uid),
            expires_in: 3600,
        })
    }

    async fn verify_token(&self, id_token: &str) -> Result<TokenClaims, AuthError> {
        let uid = id_token
            .strip_prefix("id-token-")
            .ok_or(AuthError::InvalidToken)?;
        let accounts = self.accounts.read().await;
        let account = accounts.get(uid).ok_or(AuthError::InvalidToken)?;
        Ok(TokenClaims {
            uid: account.user.uid.clone(),
            email: Some(account.user.email.clone()),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        })
    }

    async fn create_custom_token(
        &self,
        uid: &str,
        claims: &Map<String, Value>,
    ) -> Result<String, AuthError> {
        if !self.accounts.read().await.contains_key(uid) {
            return Err(AuthError::UserNotFound);
        }
        self.custom_claims
            .write()
            .await
            .insert(uid.to_string(), claims.clone());
        Ok(format!("custom-token-{}", uid))
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        self.accounts
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or(AuthError::UserNotFound)
    }
}
