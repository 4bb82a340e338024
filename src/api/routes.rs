//! API route definitions

use super::auth_handlers;
use super::handlers::{self, AppState};
use super::user_handlers;
use super::vehicle_handlers;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Authentication
        // ====================================================================
        .route(
            "/api/auth/register/seeker",
            post(auth_handlers::register_seeker),
        )
        .route(
            "/api/auth/register/provider",
            post(auth_handlers::register_provider),
        )
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/auth/verify", post(auth_handlers::verify_token))
        .route("/api/auth/profile", get(auth_handlers::profile))
        // ====================================================================
        // Users
        // ====================================================================
        .route(
            "/api/users/{uid}",
            get(user_handlers::get_user).delete(user_handlers::delete_user),
        )
        .route("/api/seekers", get(user_handlers::list_seekers))
        .route(
            "/api/seekers/{uid}/profile",
            patch(user_handlers::update_seeker_profile),
        )
        .route(
            "/api/seekers/{uid}/similar",
            get(user_handlers::similar_seekers),
        )
        .route(
            "/api/seekers/{uid}/similarity/recompute",
            post(user_handlers::recompute_similarity),
        )
        .route("/api/providers", get(user_handlers::list_providers))
        .route(
            "/api/providers/search",
            get(user_handlers::search_providers),
        )
        .route(
            "/api/providers/business-types",
            get(user_handlers::business_types),
        )
        .route(
            "/api/providers/{uid}/verify",
            put(user_handlers::verify_provider),
        )
        .route(
            "/api/providers/{uid}/profile",
            patch(user_handlers::update_provider_profile),
        )
        .route(
            "/api/providers/{uid}/vehicles",
            get(vehicle_handlers::list_provider_vehicles),
        )
        .route(
            "/api/providers/{uid}/services",
            get(vehicle_handlers::list_provider_services),
        )
        // ====================================================================
        // Vehicles
        // ====================================================================
        .route("/api/vehicles", post(vehicle_handlers::create_vehicle))
        .route(
            "/api/vehicles/{vehicle_id}",
            get(vehicle_handlers::get_vehicle)
                .patch(vehicle_handlers::update_vehicle)
                .delete(vehicle_handlers::delete_vehicle),
        )
        .route(
            "/api/vehicles/{vehicle_id}/availability",
            put(vehicle_handlers::set_vehicle_availability),
        )
        .route(
            "/api/vehicles/{vehicle_id}/services",
            get(vehicle_handlers::list_vehicle_services),
        )
        // ====================================================================
        // Services
        // ====================================================================
        .route("/api/services", post(vehicle_handlers::create_service))
        .route(
            "/api/services/{service_id}",
            get(vehicle_handlers::get_service)
                .patch(vehicle_handlers::update_service)
                .delete(vehicle_handlers::delete_service),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
