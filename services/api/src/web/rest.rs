//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use travel_nutrition_core::domain::{
    AlertKind, ClimateCategory, Coordinates, DailyActivity, DynamicTargets, HydrationAlert,
    LoggedMeal, MealSuggestion, SeasonContext, TargetDeltas, Trip, UserProfile, WeatherReport,
    WeatherSnapshot, WeatherSource,
};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        dynamic_targets_handler,
        weather_handler,
        health_handler,
    ),
    components(
        schemas(
            DynamicTargetsRequest, HealthResponse, DynamicTargets, UserProfile, DailyActivity,
            LoggedMeal, Trip, WeatherSnapshot, WeatherReport, WeatherSource, SeasonContext,
            ClimateCategory, Coordinates, TargetDeltas, HydrationAlert, AlertKind, MealSuggestion,
        )
    ),
    tags(
        (name = "Travel Nutrition API", description = "Weather- and activity-adjusted nutrition targets for travellers.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Everything needed to compute today's targets.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicTargetsRequest {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub daily_log: DailyActivity,
    #[serde(default)]
    pub trip: Trip,
    /// A pre-fetched reading; when absent the weather provider is queried.
    pub live_weather: Option<WeatherSnapshot>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    /// Free-text destination, e.g. `Japan` or `Tokyo`.
    pub destination: String,
    /// Optional ISO trip date used for the seasonal adjustment.
    pub trip_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Compute adjusted water and calorie targets for today.
///
/// Missing or malformed numeric inputs fall back to their defaults, and weather or
/// advisor outages fall back to fixed values, so this endpoint always answers.
#[utoipa::path(
    post,
    path = "/dynamic-targets",
    request_body = DynamicTargetsRequest,
    responses(
        (status = 200, description = "Adjusted targets for today", body = DynamicTargets),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Body does not have the expected structure")
    )
)]
pub async fn dynamic_targets_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<DynamicTargetsRequest>,
) -> Json<DynamicTargets> {
    info!("Computing dynamic targets for '{}'", payload.trip.destination);
    let targets = app_state
        .engine
        .compute_dynamic_targets(
            &payload.profile,
            &payload.daily_log,
            &payload.trip,
            payload.live_weather,
        )
        .await;
    Json(targets)
}

/// Report the weather reading the engine would use for a destination.
#[utoipa::path(
    get,
    path = "/weather",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Raw and effective weather", body = WeatherReport)
    )
)]
pub async fn weather_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Json<WeatherReport> {
    let report = app_state
        .engine
        .weather_report(&query.destination, query.trip_date.as_deref(), None)
        .await;
    Json(report)
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::app_router;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Utc;
    use tower::ServiceExt;
    use tower_http::cors::CorsLayer;
    use travel_nutrition_core::{
        ports::{PortError, PortResult, WeatherService},
        TargetAdjustmentEngine,
    };

    struct FixedWeather(Option<f64>);

    #[async_trait]
    impl WeatherService for FixedWeather {
        async fn current_weather(&self, _: &Coordinates) -> PortResult<WeatherSnapshot> {
            let temperature_c = self
                .0
                .ok_or_else(|| PortError::Unexpected("offline".to_string()))?;
            Ok(WeatherSnapshot {
                temperature_c,
                apparent_temperature_c: temperature_c,
                humidity_percent: 50.0,
                weather_code: 0,
                fetched_at: Utc::now(),
            })
        }
    }

    fn router(weather: FixedWeather) -> Router {
        let state = Arc::new(AppState {
            engine: TargetAdjustmentEngine::new(Arc::new(weather), None),
        });
        app_router(state, CorsLayer::new())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn dynamic_targets_round_trip() {
        let body = r#"{
            "profile": {"baseWaterTargetMl": 2500, "allergies": ["peanut"]},
            "dailyLog": {"steps": 15000, "meals": [{"name": "Breakfast", "calories": 600}]},
            "trip": {"destination": "Japan", "tripDate": "2026-07-15"},
            "liveWeather": {"temperatureC": 31.0, "apparentTemperatureC": 34.0, "humidityPercent": 85}
        }"#;
        let response = router(FixedWeather(None))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dynamic-targets")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["adjustedWaterTargetMl"], 4600);
        assert_eq!(json["consumedCalories"], 600);
        assert_eq!(json["remainingCalories"], 1880);
        assert_eq!(json["hydrationAlert"]["kind"], "mixed");
        assert_eq!(json["weather"]["source"], "supplied");
        assert_eq!(json["extraMealSuggestion"]["title"], "Traditional local meal");
    }

    #[tokio::test]
    async fn malformed_numbers_fall_back_to_defaults() {
        let body = r#"{
            "profile": {"baseWaterTargetMl": "plenty", "baseCalorieTarget": null},
            "dailyLog": {"steps": "many", "meals": [{"calories": "1900"}]},
            "trip": {"destination": "Atlantis", "tripDate": "not-a-date"}
        }"#;
        let response = router(FixedWeather(Some(40.0)))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dynamic-targets")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["baseWaterTargetMl"], 2500);
        assert_eq!(json["baseCalorieTarget"], 2000);
        assert_eq!(json["deltas"]["stepWaterMl"], 0);
        assert_eq!(json["weather"]["source"], "default");
        assert!(json.get("extraMealSuggestion").is_none());
    }

    #[tokio::test]
    async fn weather_endpoint_reports_default_on_outage() {
        let response = router(FixedWeather(None))
            .oneshot(
                Request::builder()
                    .uri("/weather?destination=Japan&tripDate=2026-04-02")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["source"], "default");
        assert_eq!(json["raw"]["temperatureC"], 22.0);
        assert_eq!(json["effectiveTemperatureC"], 22.0);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = router(FixedWeather(None))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}
