//! User, profile and similarity endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::handlers::{ok_body, AppError, AppState, PaginationParams};
use crate::auth::{validate, AuthError};
use crate::neo4j::{
    ProviderProfileUpdate, ProviderSearchFilters, SeekerProfileUpdate, UserRecord,
};

/// GET /api/users/{uid}
pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.get_user_by_uid(&uid).await? {
        Some(user) => Ok(ok_body(user)),
        None => Err(AppError::NotFound(format!("user not found: {}", uid))),
    }
}

/// DELETE /api/users/{uid}
///
/// Removes both the identity account and the graph profile. A missing
/// identity account is tolerated so a half-registered user can still be
/// cleaned up.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.get_user_by_uid(&uid).await?.is_none() {
        return Err(AppError::NotFound(format!("user not found: {}", uid)));
    }

    match state.identity.delete_user(&uid).await {
        Ok(()) | Err(AuthError::UserNotFound) => {}
        Err(e) => return Err(e.into()),
    }
    state.store.delete_user(&uid).await?;

    Ok(Json(json!({ "success": true, "message": "user deleted" })))
}

/// GET /api/seekers
pub async fn list_seekers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let seekers = state.store.list_seekers(params.limit, params.skip).await?;
    Ok(ok_body(seekers))
}

/// GET /api/providers
pub async fn list_providers(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let providers = state
        .store
        .list_providers(params.limit, params.skip)
        .await?;
    Ok(ok_body(providers))
}

#[derive(Debug, Deserialize)]
pub struct SearchProvidersParams {
    pub business_type: Option<String>,
    #[serde(default)]
    pub min_rating: f64,
    pub is_verified: Option<bool>,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    20
}

/// GET /api/providers/search
pub async fn search_providers(
    State(state): State<AppState>,
    Query(params): Query<SearchProvidersParams>,
) -> Result<impl IntoResponse, AppError> {
    let filters = ProviderSearchFilters {
        business_type: params.business_type,
        min_rating: params.min_rating,
        is_verified: params.is_verified,
    };
    let providers = state.store.search_providers(&filters, params.limit).await?;
    Ok(ok_body(providers))
}

#[derive(Debug, Deserialize)]
pub struct VerifyProviderRequest {
    pub status: String,
}

/// PUT /api/providers/{uid}/verify
///
/// Records the outcome of a document review. "approved" marks the provider
/// verified; "rejected" and "pending" clear the flag.
pub async fn verify_provider(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(req): Json<VerifyProviderRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, AppError> {
    if !matches!(req.status.as_str(), "approved" | "rejected" | "pending") {
        return Err(AppError::BadRequest(format!(
            "invalid verification status: {}",
            req.status
        )));
    }

    match state
        .store
        .set_provider_verification(&uid, &req.status)
        .await?
    {
        Some(provider) => Ok(ok_body(provider)),
        None => Err(AppError::NotFound(format!("provider not found: {}", uid))),
    }
}

/// GET /api/providers/business-types
pub async fn business_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let types = state.store.list_business_types().await?;
    Ok(ok_body(types))
}

/// PATCH /api/seekers/{uid}/profile
///
/// When the update touches a preference field the seeker's similarity edges
/// are recomputed inline. A recompute failure is logged, not surfaced; the
/// profile write already succeeded and the next recompute self-heals.
pub async fn update_seeker_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(update): Json<SeekerProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(name) = &update.full_name {
        validate::validate_full_name(name).map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    if let Some(phone) = &update.phone {
        validate::validate_phone(phone).map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    let Some(seeker) = state.store.update_seeker_profile(&uid, &update).await? else {
        return Err(AppError::NotFound(format!("seeker not found: {}", uid)));
    };

    if update.touches_preferences() {
        if let Err(e) = state.engine.recompute(&uid).await {
            warn!(uid, error = %e, "similarity recompute after profile update failed");
        }
    }

    Ok(ok_body(seeker))
}

/// PATCH /api/providers/{uid}/profile
pub async fn update_provider_profile(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(update): Json<ProviderProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(name) = &update.full_name {
        validate::validate_full_name(name).map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    if let Some(phone) = &update.phone {
        validate::validate_phone(phone).map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    if let Some(name) = &update.business_name {
        validate::validate_business_name(name)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    if let Some(years) = update.years_experience {
        validate::validate_years_experience(years)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    if let Some(description) = &update.description {
        validate::validate_description(description)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    match state.store.update_provider_profile(&uid, &update).await? {
        Some(provider) => Ok(ok_body(provider)),
        None => Err(AppError::NotFound(format!("provider not found: {}", uid))),
    }
}

#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    /// Values at or below zero yield an empty list, not an error
    #[serde(default = "default_similar_limit")]
    pub limit: i64,
}

fn default_similar_limit() -> i64 {
    10
}

/// GET /api/seekers/{uid}/similar
pub async fn similar_seekers(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<impl IntoResponse, AppError> {
    require_seeker(&state, &uid).await?;
    let limit = usize::try_from(params.limit).unwrap_or(0);
    let similar = state.engine.similar_seekers(&uid, limit).await?;
    Ok(ok_body(similar))
}

/// POST /api/seekers/{uid}/similarity/recompute
pub async fn recompute_similarity(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_seeker(&state, &uid).await?;
    let outcome = state.engine.recompute(&uid).await?;
    Ok(ok_body(outcome))
}

async fn require_seeker(state: &AppState, uid: &str) -> Result<(), AppError> {
    match state.store.get_user_by_uid(uid).await? {
        Some(UserRecord::Seeker(_)) => Ok(()),
        Some(UserRecord::Provider(_)) => {
            Err(AppError::BadRequest(format!("user is not a seeker: {}", uid)))
        }
        None => Err(AppError::NotFound(format!("seeker not found: {}", uid))),
    }
}
