//! Vehicle and service endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::handlers::{ok_body, AppError, AppState};
use crate::auth::validate;
use crate::neo4j::{
    ServiceNode, ServiceUpdate, UserRecord, VehicleNode, VehicleUpdate,
};

/// Creation payload for a vehicle
#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub provider_uid: String,
    pub name: String,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub registration_number: String,
    pub capacity: Option<String>,
    pub condition: String,
    pub vehicle_image: Option<String>,
    pub additional_images: Option<String>,
    #[serde(default)]
    pub has_insurance: bool,
    pub insurance_expiry: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub description: Option<String>,
}

/// Creation payload for a service
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub provider_uid: String,
    pub vehicle_id: String,
    pub service_name: String,
    pub service_category: String,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub price_per_service: Option<f64>,
    pub description: Option<String>,
    pub service_area: Option<String>,
    pub min_booking_duration: Option<String>,
    pub available_days: Option<String>,
    pub available_hours: Option<String>,
    #[serde(default)]
    pub operator_included: bool,
    #[serde(default)]
    pub fuel_included: bool,
    #[serde(default)]
    pub transportation_included: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

async fn require_provider(state: &AppState, uid: &str) -> Result<(), AppError> {
    match state.store.get_user_by_uid(uid).await? {
        Some(UserRecord::Provider(_)) => Ok(()),
        Some(UserRecord::Seeker(_)) => Err(AppError::BadRequest(format!(
            "user is not a provider: {}",
            uid
        ))),
        None => Err(AppError::NotFound(format!("provider not found: {}", uid))),
    }
}

// ============================================================================
// Vehicles
// ============================================================================

/// POST /api/vehicles
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(req): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_provider(&state, &req.provider_uid).await?;
    if let Some(description) = &req.description {
        validate::validate_description(description)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    let now = Utc::now();
    let vehicle = VehicleNode {
        vehicle_id: Uuid::new_v4().to_string(),
        provider_uid: req.provider_uid,
        name: req.name,
        vehicle_type: req.vehicle_type,
        make: req.make,
        model: req.model,
        year: req.year,
        registration_number: req.registration_number,
        capacity: req.capacity,
        condition: req.condition,
        vehicle_image: req.vehicle_image,
        additional_images: req.additional_images,
        has_insurance: req.has_insurance,
        insurance_expiry: req.insurance_expiry,
        is_available: true,
        city: req.city,
        province: req.province,
        price_per_hour: req.price_per_hour,
        price_per_day: req.price_per_day,
        description: req.description,
        created_at: now,
        updated_at: now,
    };

    let created = state.store.create_vehicle(&vehicle).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// GET /api/vehicles/{vehicle_id}
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.get_vehicle(&vehicle_id).await? {
        Some(vehicle) => Ok(ok_body(vehicle)),
        None => Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            vehicle_id
        ))),
    }
}

/// GET /api/providers/{uid}/vehicles
pub async fn list_provider_vehicles(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_provider(&state, &uid).await?;
    let vehicles = state.store.list_provider_vehicles(&uid).await?;
    Ok(ok_body(vehicles))
}

/// PATCH /api/vehicles/{vehicle_id}
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
    Json(update): Json<VehicleUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(description) = &update.description {
        validate::validate_description(description)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    match state.store.update_vehicle(&vehicle_id, &update).await? {
        Some(vehicle) => Ok(ok_body(vehicle)),
        None => Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            vehicle_id
        ))),
    }
}

/// DELETE /api/vehicles/{vehicle_id}
///
/// Cascades to the vehicle's services.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.delete_vehicle(&vehicle_id).await? {
        Ok(Json(json!({ "success": true, "message": "vehicle deleted" })))
    } else {
        Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            vehicle_id
        )))
    }
}

/// PUT /api/vehicles/{vehicle_id}/availability
pub async fn set_vehicle_availability(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state
        .store
        .set_vehicle_availability(&vehicle_id, req.is_available)
        .await?
    {
        Ok(Json(json!({
            "success": true,
            "data": { "vehicle_id": vehicle_id, "is_available": req.is_available }
        })))
    } else {
        Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            vehicle_id
        )))
    }
}

// ============================================================================
// Services
// ============================================================================

/// POST /api/services
pub async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_provider(&state, &req.provider_uid).await?;
    let Some(vehicle) = state.store.get_vehicle(&req.vehicle_id).await? else {
        return Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            req.vehicle_id
        )));
    };
    if vehicle.provider_uid != req.provider_uid {
        return Err(AppError::BadRequest(
            "vehicle belongs to a different provider".to_string(),
        ));
    }
    if let Some(description) = &req.description {
        validate::validate_description(description)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    let now = Utc::now();
    let service = ServiceNode {
        service_id: Uuid::new_v4().to_string(),
        vehicle_id: req.vehicle_id,
        provider_uid: req.provider_uid,
        service_name: req.service_name,
        service_category: req.service_category,
        price_per_hour: req.price_per_hour,
        price_per_day: req.price_per_day,
        price_per_service: req.price_per_service,
        description: req.description,
        service_area: req.service_area,
        min_booking_duration: req.min_booking_duration,
        is_active: true,
        available_days: req.available_days,
        available_hours: req.available_hours,
        operator_included: req.operator_included,
        fuel_included: req.fuel_included,
        transportation_included: req.transportation_included,
        total_bookings: 0,
        rating: 0.0,
        created_at: now,
        updated_at: now,
    };

    let created = state.store.create_service(&service).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// GET /api/services/{service_id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.get_service(&service_id).await? {
        Some(service) => Ok(ok_body(service)),
        None => Err(AppError::NotFound(format!(
            "service not found: {}",
            service_id
        ))),
    }
}

/// GET /api/vehicles/{vehicle_id}/services
pub async fn list_vehicle_services(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.get_vehicle(&vehicle_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "vehicle not found: {}",
            vehicle_id
        )));
    }
    let services = state.store.list_vehicle_services(&vehicle_id).await?;
    Ok(ok_body(services))
}

/// GET /api/providers/{uid}/services
pub async fn list_provider_services(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_provider(&state, &uid).await?;
    let services = state.store.list_provider_services(&uid).await?;
    Ok(ok_body(services))
}

/// PATCH /api/services/{service_id}
pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Json(update): Json<ServiceUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(description) = &update.description {
        validate::validate_description(description)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }
    match state.store.update_service(&service_id, &update).await? {
        Some(service) => Ok(ok_body(service)),
        None => Err(AppError::NotFound(format!(
            "service not found: {}",
            service_id
        ))),
    }
}

/// DELETE /api/services/{service_id}
pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.delete_service(&service_id).await? {
        Ok(Json(json!({ "success": true, "message": "service deleted" })))
    } else {
        Err(AppError::NotFound(format!(
            "service not found: {}",
            service_id
        )))
    }
}
