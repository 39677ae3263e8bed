pub mod rest;
pub mod state;

use crate::error::ApiError;
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{dynamic_targets_handler, health_handler, weather_handler, ApiDoc};
pub use state::AppState;

/// Builds the CORS policy for the configured front-end origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ApiError> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin '{}': {}", origin, e)))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]))
}

/// Assembles the API routes and the Swagger UI into one router.
pub fn app_router(app_state: Arc<AppState>, cors: CorsLayer) -> Router {
    let api_router = Router::new()
        .route("/dynamic-targets", post(dynamic_targets_handler))
        .route("/weather", get(weather_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
