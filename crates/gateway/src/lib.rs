//! HTTP API surface for the Parley backend.
//!
//! Routes requests to the room and message services and maps domain errors
//! to HTTP status codes.

use axum::Router;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod rest;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// Builds the full application router with CORS enabled.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::health::routes())
        .merge(rest::room::routes())
        .merge(rest::message::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
