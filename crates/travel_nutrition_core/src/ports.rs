//! crates/travel_nutrition_core/src/ports.rs
//!
//! Defines the service contracts (traits) the engine depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete weather provider and meal advisor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{lenient_int, Coordinates, WeatherSnapshot};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, LLM).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Advisor Payloads
//=========================================================================================

/// Everything the meal advisor is told about the user's situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAdvisorRequest {
    pub destination: String,
    pub remaining_calories: i64,
    pub allergies: Vec<String>,
    pub dietary_preferences: Vec<String>,
    pub already_selected_dish_names: Vec<String>,
}

/// A suggestion exactly as the advisor returned it; the engine normalizes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorSuggestion {
    pub title: Option<String>,
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub estimated_calories: Option<i64>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Fetches the current conditions at the given coordinates.
    async fn current_weather(&self, coordinates: &Coordinates) -> PortResult<WeatherSnapshot>;
}

#[async_trait]
pub trait MealAdvisorService: Send + Sync {
    /// Proposes one supplementary meal for the remaining calorie budget.
    async fn suggest_extra_meal(&self, request: &MealAdvisorRequest)
        -> PortResult<AdvisorSuggestion>;
}
