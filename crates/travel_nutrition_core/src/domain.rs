//! crates/travel_nutrition_core/src/domain.rs
//!
//! Defines the value objects consumed and produced by the target adjustment engine.
//! Every type here is an immutable snapshot passed in per call; nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_BASE_WATER_TARGET_ML: i64 = 2500;
pub const DEFAULT_BASE_CALORIE_TARGET: i64 = 2000;

//=========================================================================================
// Inputs
//=========================================================================================

/// The slice of the user's profile the engine needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient_int")]
    pub base_water_target_ml: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub base_calorie_target: Option<i64>,
    pub allergies: Vec<String>,
    pub dietary_preferences: Vec<String>,
}

impl UserProfile {
    /// The water baseline, or the default when absent or not positive.
    pub fn water_baseline_ml(&self) -> i64 {
        positive_or(self.base_water_target_ml, DEFAULT_BASE_WATER_TARGET_ML)
    }

    /// The calorie baseline, or the default when absent or not positive.
    pub fn calorie_baseline(&self) -> i64 {
        positive_or(self.base_calorie_target, DEFAULT_BASE_CALORIE_TARGET)
    }
}

/// A meal the user has already logged today.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedMeal {
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub calories: Option<i64>,
}

/// Today's activity as recorded by the daily logger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyActivity {
    #[serde(deserialize_with = "lenient_int")]
    pub steps: Option<i64>,
    pub meals: Vec<LoggedMeal>,
}

impl DailyActivity {
    /// Step count with missing or negative values treated as zero.
    pub fn step_count(&self) -> i64 {
        self.steps.unwrap_or(0).max(0)
    }

    /// Sum of today's logged meal calories; bad entries count as zero.
    pub fn consumed_calories(&self) -> i64 {
        self.meals
            .iter()
            .map(|meal| meal.calories.unwrap_or(0).max(0))
            .fold(0, i64::saturating_add)
    }
}

/// The trip the user is currently on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    pub destination: String,
    /// ISO `YYYY-MM-DD` date; anything unparseable is treated as today.
    pub trip_date: Option<String>,
    /// Dishes the user already picked for this trip.
    pub selected_dishes: Vec<String>,
}

/// A point on the globe used to query the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single weather reading for a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_percent: f64,
    #[serde(default)]
    pub weather_code: i32,
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// The reading used whenever live weather is unavailable.
    pub fn default_at(fetched_at: DateTime<Utc>) -> Self {
        Self {
            temperature_c: 22.0,
            apparent_temperature_c: 22.0,
            humidity_percent: 50.0,
            weather_code: 0,
            fetched_at,
        }
    }

    pub(crate) fn humidity(&self) -> f64 {
        if self.humidity_percent.is_finite() {
            self.humidity_percent.clamp(0.0, 100.0)
        } else {
            50.0
        }
    }
}

//=========================================================================================
// Derived context
//=========================================================================================

/// Which seasonal rule a destination follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClimateCategory {
    /// Perpetually hot destinations.
    Tropical,
    Southern,
    Northern,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonContext {
    pub category: ClimateCategory,
    pub month: u32,
    pub is_summer_locally: bool,
    pub seasonal_heat_boost_c: f64,
}

/// Where the weather reading used for a computation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    /// Fetched from the weather provider during this request.
    Live,
    /// Pre-fetched by the caller.
    Supplied,
    /// Provider unavailable or destination unmapped.
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub destination: String,
    pub source: WeatherSource,
    pub raw: WeatherSnapshot,
    pub effective_temperature_c: f64,
    pub season: SeasonContext,
}

//=========================================================================================
// Outputs
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    None,
    Heat,
    Activity,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HydrationAlert {
    pub needs_alert: bool,
    pub kind: AlertKind,
    /// Empty when no alert is raised.
    pub reason: String,
}

/// The itemised adjustments behind the adjusted targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetDeltas {
    /// Weather delta before the cold-weather floor.
    pub raw_weather_water_ml: i64,
    pub weather_water_ml: i64,
    pub step_water_ml: i64,
    pub weather_calories: i64,
    pub step_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestion {
    pub title: String,
    pub reason: String,
    pub estimated_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicTargets {
    pub base_water_target_ml: i64,
    pub adjusted_water_target_ml: i64,
    pub base_calorie_target: i64,
    pub adjusted_calorie_target: i64,
    pub deltas: TargetDeltas,
    pub consumed_calories: i64,
    pub remaining_calories: i64,
    pub hydration_alert: HydrationAlert,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_meal_suggestion: Option<MealSuggestion>,
    pub weather: WeatherReport,
    pub last_updated_at: DateTime<Utc>,
}

//=========================================================================================
// Lenient numeric decoding
//=========================================================================================

fn positive_or(value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts integers, floats and numeric strings; anything else decodes as `None`.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        LooseNumber::Int(i) => Some(i),
        LooseNumber::Float(f) => float_to_int(f),
        LooseNumber::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        LooseNumber::Other(_) => None,
    }))
}

fn float_to_int(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}
