//! HTTP API: routes, handlers and shared server state

pub mod auth_handlers;
pub mod handlers;
pub mod routes;
pub mod user_handlers;
pub mod vehicle_handlers;

pub use handlers::{AppError, AppState, ServerState};
pub use routes::create_router;
