//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{OpenAiMealAdapter, OpenMeteoWeatherAdapter},
    config::Config,
    error::ApiError,
    web::{app_router, cors_layer, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_nutrition_core::{ports::MealAdvisorService, TargetAdjustmentEngine};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let weather_adapter = Arc::new(OpenMeteoWeatherAdapter::new(config.weather_api_url.clone())?);
    info!("Weather provider: {}", config.weather_api_url);

    let meal_adapter: Option<Arc<dyn MealAdvisorService>> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            info!("Meal advisor enabled with model {}", config.meal_model);
            let adapter: Arc<dyn MealAdvisorService> = Arc::new(OpenAiMealAdapter::new(
                openai_client,
                config.meal_model.clone(),
            ));
            Some(adapter)
        }
        None => {
            warn!("OPENAI_API_KEY not set; extra meals fall back to the generic suggestion");
            None
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        engine: TargetAdjustmentEngine::new(weather_adapter, meal_adapter),
    });

    // --- 4. Create the Web Router ---
    let app = app_router(app_state, cors_layer(&config.cors_origin)?);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
