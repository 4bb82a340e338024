//! Registration, login and token verification flows.
//!
//! Registration is a two-phase write: the identity account is created first,
//! then the graph profile. If the graph write fails the identity account is
//! rolled back so an email never ends up registered without a profile.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::provider::{AuthError, AuthSession, IdentityProvider, TokenClaims};
use crate::auth::validate;
use crate::neo4j::{
    GraphStore, ProviderNode, SeekerNode, UserRecord, UserType,
};

/// Developer claims minted into every custom token
fn role_claims(user_type: UserType) -> serde_json::Map<String, serde_json::Value> {
    let mut claims = serde_json::Map::new();
    claims.insert(
        "user_type".to_string(),
        serde_json::Value::String(user_type.as_str().to_string()),
    );
    claims
}

/// Registration payload for a seeker account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterSeekerRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
}

/// Registration payload for a provider account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterProviderRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub years_experience: Option<i64>,
    pub description: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Orchestrates the identity service and the graph for account flows.
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn GraphStore>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn GraphStore>) -> Self {
        Self { identity, store }
    }

    /// Register a seeker account. Returns the created profile and a custom
    /// sign-in token for the new uid.
    pub async fn register_seeker(
        &self,
        req: &RegisterSeekerRequest,
    ) -> Result<(SeekerNode, String), AuthError> {
        validate::validate_email(&req.email)?;
        validate::validate_password(&req.password)?;
        validate::validate_full_name(&req.full_name)?;
        validate::validate_phone(&req.phone)?;

        if self.store.user_exists_by_email(req.email.trim()).await? {
            return Err(AuthError::EmailExists);
        }

        let auth_user = self
            .identity
            .create_user(req.email.trim(), &req.password, req.full_name.trim())
            .await?;

        let seeker = SeekerNode::new(
            auth_user.uid.clone(),
            auth_user.email.clone(),
            req.full_name.trim().to_string(),
            req.phone.clone(),
        );

        let seeker = match self.store.create_seeker(&seeker).await {
            Ok(s) => s,
            Err(e) => {
                self.rollback_identity(&auth_user.uid).await;
                return Err(AuthError::Other(e));
            }
        };

        let token = self
            .identity
            .create_custom_token(&seeker.uid, &role_claims(UserType::Seeker))
            .await?;
        info!(uid = %seeker.uid, "seeker registered");
        Ok((seeker, token))
    }

    /// Register a provider account, with the same rollback semantics.
    pub async fn register_provider(
        &self,
        req: &RegisterProviderRequest,
    ) -> Result<(ProviderNode, String), AuthError> {
        validate::validate_email(&req.email)?;
        validate::validate_password(&req.password)?;
        validate::validate_full_name(&req.full_name)?;
        validate::validate_phone(&req.phone)?;
        if let Some(name) = &req.business_name {
            validate::validate_business_name(name)?;
        }
        if let Some(years) = req.years_experience {
            validate::validate_years_experience(years)?;
        }
        if let Some(description) = &req.description {
            validate::validate_description(description)?;
        }

        if self.store.user_exists_by_email(req.email.trim()).await? {
            return Err(AuthError::EmailExists);
        }

        let auth_user = self
            .identity
            .create_user(req.email.trim(), &req.password, req.full_name.trim())
            .await?;

        let mut provider = ProviderNode::new(
            auth_user.uid.clone(),
            auth_user.email.clone(),
            req.full_name.trim().to_string(),
            req.phone.clone(),
        );
        provider.business_name = req.business_name.clone();
        provider.business_type = req.business_type.clone();
        provider.years_experience = req.years_experience;
        provider.description = req.description.clone();

        let provider = match self.store.create_provider(&provider).await {
            Ok(p) => p,
            Err(e) => {
                self.rollback_identity(&auth_user.uid).await;
                return Err(AuthError::Other(e));
            }
        };

        let token = self
            .identity
            .create_custom_token(&provider.uid, &role_claims(UserType::Provider))
            .await?;
        info!(uid = %provider.uid, "provider registered");
        Ok((provider, token))
    }

    /// Verify credentials and return the session with the graph profile.
    pub async fn login(&self, req: &LoginRequest) -> Result<(UserRecord, AuthSession), AuthError> {
        let session = self
            .identity
            .sign_in(req.email.trim(), &req.password)
            .await?;

        let Some(profile) = self.store.get_user_by_uid(&session.uid).await? else {
            // Identity account without a graph profile: a registration that
            // was rolled back half-way, or external account creation.
            error!(uid = %session.uid, "authenticated user has no graph profile");
            return Err(AuthError::UserNotFound);
        };

        info!(uid = %session.uid, user_type = profile.user_type().as_str(), "login");
        Ok((profile, session))
    }

    /// Validate an ID token and attach the graph profile when one exists.
    pub async fn verify(
        &self,
        id_token: &str,
    ) -> Result<(TokenClaims, Option<UserRecord>), AuthError> {
        let claims = self.identity.verify_token(id_token).await?;
        let profile = self.store.get_user_by_uid(&claims.uid).await?;
        Ok((claims, profile))
    }

    async fn rollback_identity(&self, uid: &str) {
        if let Err(e) = self.identity.delete_user(uid).await {
            // An orphaned identity account blocks the email from registering
            // again; this needs operator attention.
            warn!(uid, error = %e, "failed to roll back identity account");
        }
    }
}
