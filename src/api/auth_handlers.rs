//! Authentication endpoints: registration, login, token verification

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::handlers::{AppError, AppState};
use crate::auth::{LoginRequest, RegisterProviderRequest, RegisterSeekerRequest};

/// POST /api/auth/register/seeker
pub async fn register_seeker(
    State(state): State<AppState>,
    Json(req): Json<RegisterSeekerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (seeker, token) = state.auth.register_seeker(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "user": seeker, "token": token }
        })),
    ))
}

/// POST /api/auth/register/provider
pub async fn register_provider(
    State(state): State<AppState>,
    Json(req): Json<RegisterProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (provider, token) = state.auth.register_provider(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "user": provider, "token": token }
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (profile, session) = state.auth.login(&req).await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "user": profile,
            "id_token": session.id_token,
            "refresh_token": session.refresh_token,
            "expires_in": session.expires_in,
        }
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub id_token: String,
}

/// POST /api/auth/verify
pub async fn verify_token(
    State(state): State<AppState>,
    Json(req): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (claims, profile) = state.auth.verify(&req.id_token).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "claims": claims, "user": profile }
    })))
}

/// GET /api/auth/profile
///
/// Returns the profile of the user identified by the `Authorization: Bearer`
/// token.
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = bearer_token(&headers)?;
    let (claims, profile) = state.auth.verify(token).await?;
    let profile =
        profile.ok_or_else(|| AppError::NotFound(format!("no profile for uid {}", claims.uid)))?;
    Ok(Json(json!({
        "success": true,
        "data": { "user": profile }
    })))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
}
