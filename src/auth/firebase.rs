//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Account creation, password sign-in, lookups and deletion go through the
//! REST endpoints; custom sign-in tokens are minted locally as RS256 JWTs
//! signed with the service-account key. The API base URL is configurable so
//! tests and local development can point at an emulator.

use anyhow::{anyhow, Context};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::auth::provider::{AuthError, AuthSession, AuthUser, IdentityProvider, TokenClaims};
use crate::FirebaseConfig;

/// Audience claim required on custom tokens
const CUSTOM_TOKEN_AUD: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Lifetime of a minted custom token, in seconds (the API maximum)
const CUSTOM_TOKEN_TTL_SECS: i64 = 3600;

/// ID tokens issued by the service are hour-lived
const ID_TOKEN_TTL_SECS: i64 = 3600;

const MAX_ATTEMPTS: u32 = 3;

/// Firebase Auth client for the Identity Toolkit REST API
pub struct FirebaseAuthClient {
    api_key: String,
    base_url: String,
    service_account_email: Option<String>,
    service_account_key: Option<String>,
    http_client: reqwest::Client,
}

/// Claims of a locally minted custom token
#[derive(Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    uid: &'a str,
    /// Developer claims, surfaced to the client when it exchanges the token
    #[serde(skip_serializing_if = "Map::is_empty")]
    claims: &'a Map<String, Value>,
}

impl FirebaseAuthClient {
    /// Create a new client from the Firebase configuration.
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_account_email: config.service_account_email.clone(),
            service_account_key: config.service_account_key.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, action, self.api_key
        )
    }

    /// POST a JSON body, retrying transient failures (network errors and
    /// 5xx responses) with exponential backoff.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, AuthError> {
        let mut backoff = Duration::from_millis(200);
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let response = match self.http_client.post(url).json(body).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "identity request failed");
                    last_err = Some(AuthError::Unavailable(e.to_string()));
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                tracing::warn!(attempt, %status, "identity service returned server error");
                last_err = Some(AuthError::Unavailable(format!("upstream status {}", status)));
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            let payload: Value = response
                .json()
                .await
                .map_err(|e| AuthError::Other(anyhow!("malformed identity response: {}", e)))?;

            if status.is_success() {
                return Ok(payload);
            }

            // Permanent failure: map the error code, no retry
            let code = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN");
            return Err(Self::map_error_code(code, status));
        }

        Err(last_err.unwrap_or_else(|| AuthError::Unavailable("retries exhausted".to_string())))
    }

    /// Map an Identity Toolkit error code to a domain error.
    fn map_error_code(code: &str, status: reqwest::StatusCode) -> AuthError {
        // Codes can carry suffixes like "WEAK_PASSWORD : ..."
        let base = code.split_whitespace().next().unwrap_or(code);
        match base {
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            "WEAK_PASSWORD" | "MISSING_PASSWORD" => AuthError::WeakPassword,
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                AuthError::InvalidCredentials
            }
            "USER_NOT_FOUND" => AuthError::UserNotFound,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_DISABLED" => AuthError::InvalidToken,
            other => AuthError::Other(anyhow!("identity error {} ({})", other, status)),
        }
    }

    fn user_from_lookup(entry: &Value) -> Result<AuthUser, AuthError> {
        let uid = entry
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::Other(anyhow!("lookup entry missing localId")))?;
        Ok(AuthUser {
            uid: uid.to_string(),
            email: entry
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            display_name: entry
                .get("displayName")
                .and_then(Value::as_str)
                .map(String::from),
            email_verified: entry
                .get("emailVerified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            disabled: entry
                .get("disabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError> {
        let payload = self
            .post_json(
                &self.endpoint("signUp"),
                &json!({
                    "email": email,
                    "password": password,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let uid = payload
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::Other(anyhow!("signUp response missing localId")))?;

        tracing::info!(uid, "identity account created");
        Ok(AuthUser {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            email_verified: false,
            disabled: false,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let payload = match self
            .post_json(&self.endpoint("lookup"), &json!({ "email": [email] }))
            .await
        {
            Ok(p) => p,
            Err(AuthError::UserNotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        match payload.get("users").and_then(Value::as_array) {
            Some(users) if !users.is_empty() => Ok(Some(Self::user_from_lookup(&users[0])?)),
            _ => Ok(None),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let payload = self
            .post_json(
                &self.endpoint("signInWithPassword"),
                &json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let field = |key: &str| -> Result<String, AuthError> {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| AuthError::Other(anyhow!("signIn response missing {}", key)))
        };

        Ok(AuthSession {
            uid: field("localId")?,
            email: field("email")?,
            id_token: field("idToken")?,
            refresh_token: field("refreshToken")?,
            expires_in: payload
                .get("expiresIn")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or(ID_TOKEN_TTL_SECS),
        })
    }

    async fn verify_token(&self, id_token: &str) -> Result<TokenClaims, AuthError> {
        let payload = match self
            .post_json(&self.endpoint("lookup"), &json!({ "idToken": id_token }))
            .await
        {
            Ok(p) => p,
            Err(AuthError::UserNotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e),
        };

        let users = payload
            .get("users")
            .and_then(Value::as_array)
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::InvalidToken)?;
        let user = Self::user_from_lookup(&users[0])?;
        if user.disabled {
            return Err(AuthError::InvalidToken);
        }

        Ok(TokenClaims {
            uid: user.uid,
            email: (!user.email.is_empty()).then_some(user.email),
            expires_at: Utc::now().timestamp() + ID_TOKEN_TTL_SECS,
        })
    }

    async fn create_custom_token(
        &self,
        uid: &str,
        claims: &Map<String, Value>,
    ) -> Result<String, AuthError> {
        let (email, key) = match (&self.service_account_email, &self.service_account_key) {
            (Some(email), Some(key)) => (email, key),
            _ => {
                return Err(AuthError::Other(anyhow!(
                    "service account not configured, cannot mint custom tokens"
                )))
            }
        };

        let now = Utc::now().timestamp();
        let claims = CustomTokenClaims {
            iss: email,
            sub: email,
            aud: CUSTOM_TOKEN_AUD,
            iat: now,
            exp: now + CUSTOM_TOKEN_TTL_SECS,
            uid,
            claims,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.as_bytes())
            .context("invalid service account private key")
            .map_err(AuthError::Other)?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .context("failed to sign custom token")
            .map_err(AuthError::Other)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        self.post_json(&self.endpoint("delete"), &json!({ "localId": uid }))
            .await?;
        tracing::info!(uid, "identity account deleted");
        Ok(())
    }
}
