//! crates/travel_nutrition_core/src/engine.rs
//!
//! The target adjustment engine: turns today's weather, activity and destination
//! into adjusted hydration and calorie targets, a hydration alert, and an optional
//! supplementary meal suggestion.
//!
//! The arithmetic lives in free functions so each rule can be tested on its own;
//! `TargetAdjustmentEngine` only adds the two optional collaborator calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::destinations::{find_destination, season_context, trip_month};
use crate::domain::{
    AlertKind, DailyActivity, DynamicTargets, HydrationAlert, MealSuggestion, TargetDeltas, Trip,
    UserProfile, WeatherReport, WeatherSnapshot, WeatherSource,
};
use crate::ports::{
    AdvisorSuggestion, MealAdvisorRequest, MealAdvisorService, PortError, PortResult,
    WeatherService,
};

pub const MIN_WATER_TARGET_ML: i64 = 1500;
pub const MAX_WATER_TARGET_ML: i64 = 6000;
pub const COLD_WEATHER_FLOOR_ML: i64 = -150;
pub const EXTRA_MEAL_THRESHOLD_KCAL: i64 = 300;
pub const EXTRA_MEAL_MIN_KCAL: i64 = 150;
pub const EXTRA_MEAL_MAX_KCAL: i64 = 350;
pub const FALLBACK_MEAL_TITLE: &str = "Traditional local meal";
pub const FALLBACK_MEAL_KCAL: i64 = 250;

//=========================================================================================
// Rule Tables
//=========================================================================================

#[derive(Debug, Clone, Copy)]
enum Bracket {
    AtLeast(f64),
    Below(f64),
}

impl Bracket {
    fn matches(self, temperature_c: f64) -> bool {
        match self {
            Bracket::AtLeast(threshold) => temperature_c >= threshold,
            Bracket::Below(threshold) => temperature_c < threshold,
        }
    }
}

/// Evaluated top-down; the first matching bracket wins.
const WATER_TEMPERATURE_BRACKETS: [(Bracket, i64); 5] = [
    (Bracket::AtLeast(32.0), 900),
    (Bracket::AtLeast(28.0), 700),
    (Bracket::AtLeast(24.0), 400),
    (Bracket::Below(10.0), -250),
    (Bracket::Below(18.0), -150),
];

const CALORIE_TEMPERATURE_BRACKETS: [(Bracket, i64); 2] = [
    (Bracket::AtLeast(32.0), 80),
    (Bracket::AtLeast(28.0), 50),
];

const HUMID_THRESHOLD_PERCENT: f64 = 80.0;
const HUMID_BONUS_ML: i64 = 200;
const DRY_THRESHOLD_PERCENT: f64 = 30.0;
const DRY_BONUS_ML: i64 = 150;

/// Both step rules count from this baseline, so no step delta applies at or
/// below 3000 steps. Calories: `floor(max(0, steps - 3000) / 1000) * 40`.
const STEP_BASELINE: i64 = 3000;
const STEPS_PER_WATER_INCREMENT: i64 = 3000;
const WATER_PER_INCREMENT_ML: i64 = 250;
const MAX_STEP_WATER_ML: i64 = 1000;
const STEPS_PER_CALORIE_INCREMENT: i64 = 1000;
const CALORIES_PER_INCREMENT: i64 = 40;
const MAX_STEP_CALORIES: i64 = 400;

/// Water increase (ml) above which an alert can be raised.
const ALERT_INCREASE_ML: i64 = 300;
const HEAT_ALERT_TEMPERATURE_C: f64 = 28.0;
const ACTIVITY_ALERT_STEP_WATER_ML: i64 = 500;
const SEASONAL_BOOST_ALERT_C: f64 = 4.0;

fn bracket_delta(table: &[(Bracket, i64)], temperature_c: f64) -> i64 {
    table
        .iter()
        .find(|(bracket, _)| bracket.matches(temperature_c))
        .map_or(0, |(_, delta)| *delta)
}

//=========================================================================================
// Pure Rules
//=========================================================================================

/// Water delta from temperature bracket plus the additive humidity adjustment.
pub fn raw_weather_water_delta(effective_temperature_c: f64, humidity_percent: f64) -> i64 {
    let mut delta = bracket_delta(&WATER_TEMPERATURE_BRACKETS, effective_temperature_c);
    if humidity_percent >= HUMID_THRESHOLD_PERCENT {
        delta += HUMID_BONUS_ML;
    } else if humidity_percent <= DRY_THRESHOLD_PERCENT {
        delta += DRY_BONUS_ML;
    }
    delta
}

/// 250 ml for every full 3000 steps beyond the first 3000, capped at 1000 ml.
pub fn step_water_delta(steps: i64) -> i64 {
    let beyond = (steps - STEP_BASELINE).max(0);
    (beyond / STEPS_PER_WATER_INCREMENT * WATER_PER_INCREMENT_ML).clamp(0, MAX_STEP_WATER_ML)
}

/// 40 kcal for every full 1000 steps beyond the first 3000, capped at 400 kcal.
pub fn step_calorie_delta(steps: i64) -> i64 {
    let beyond = (steps - STEP_BASELINE).max(0);
    (beyond / STEPS_PER_CALORIE_INCREMENT * CALORIES_PER_INCREMENT).clamp(0, MAX_STEP_CALORIES)
}

pub fn weather_calorie_delta(effective_temperature_c: f64) -> i64 {
    bracket_delta(&CALORIE_TEMPERATURE_BRACKETS, effective_temperature_c)
}

/// High activity must not be cancelled by a cold-weather reduction.
pub fn apply_cold_weather_floor(raw_weather_delta: i64, step_delta: i64) -> i64 {
    if step_delta >= ACTIVITY_ALERT_STEP_WATER_ML {
        raw_weather_delta.max(COLD_WEATHER_FLOOR_ML)
    } else {
        raw_weather_delta
    }
}

pub fn classify_hydration_alert(
    water_increase_ml: i64,
    effective_temperature_c: f64,
    step_water_ml: i64,
    is_summer_locally: bool,
    seasonal_heat_boost_c: f64,
) -> HydrationAlert {
    let significant = water_increase_ml > ALERT_INCREASE_ML;
    let heat_driven = significant && effective_temperature_c >= HEAT_ALERT_TEMPERATURE_C;
    let activity_driven = significant && step_water_ml >= ACTIVITY_ALERT_STEP_WATER_ML;
    let seasonal_activity_driven = activity_driven
        && (is_summer_locally || seasonal_heat_boost_c >= SEASONAL_BOOST_ALERT_C);

    let kind = if (heat_driven && activity_driven) || seasonal_activity_driven {
        AlertKind::Mixed
    } else if heat_driven {
        AlertKind::Heat
    } else if activity_driven {
        AlertKind::Activity
    } else {
        AlertKind::None
    };

    let reason = if seasonal_activity_driven {
        format!(
            "You are very active during the warm season: drink an extra {water_increase_ml} ml today."
        )
    } else if heat_driven {
        format!(
            "It feels like {effective_temperature_c:.0}°C at your destination: drink an extra {water_increase_ml} ml today."
        )
    } else if activity_driven {
        format!("Your step count is high today: drink an extra {water_increase_ml} ml.")
    } else {
        String::new()
    };

    HydrationAlert {
        needs_alert: heat_driven || activity_driven,
        kind,
        reason,
    }
}

/// Computes every target from already-resolved inputs. Never fails.
///
/// The returned value carries no meal suggestion; see
/// [`TargetAdjustmentEngine::compute_dynamic_targets`] for that step.
pub fn compute_targets(
    profile: &UserProfile,
    activity: &DailyActivity,
    weather: WeatherReport,
    now: DateTime<Utc>,
) -> DynamicTargets {
    let base_water = profile.water_baseline_ml();
    let base_calories = profile.calorie_baseline();
    let steps = activity.step_count();
    let temperature = weather.effective_temperature_c;

    let raw_weather_water = raw_weather_water_delta(temperature, weather.raw.humidity());
    let step_water = step_water_delta(steps);
    let weather_water = apply_cold_weather_floor(raw_weather_water, step_water);
    let adjusted_water = base_water
        .saturating_add(weather_water)
        .saturating_add(step_water)
        .clamp(MIN_WATER_TARGET_ML, MAX_WATER_TARGET_ML);

    let step_calories = step_calorie_delta(steps);
    let weather_calories = weather_calorie_delta(temperature);
    let adjusted_calories = base_calories
        .saturating_add(step_calories)
        .saturating_add(weather_calories);

    let consumed = activity.consumed_calories();
    let remaining = adjusted_calories.saturating_sub(consumed).max(0);

    let hydration_alert = classify_hydration_alert(
        adjusted_water.saturating_sub(base_water),
        temperature,
        step_water,
        weather.season.is_summer_locally,
        weather.season.seasonal_heat_boost_c,
    );

    DynamicTargets {
        base_water_target_ml: base_water,
        adjusted_water_target_ml: adjusted_water,
        base_calorie_target: base_calories,
        adjusted_calorie_target: adjusted_calories,
        deltas: TargetDeltas {
            raw_weather_water_ml: raw_weather_water,
            weather_water_ml: weather_water,
            step_water_ml: step_water,
            weather_calories,
            step_calories,
        },
        consumed_calories: consumed,
        remaining_calories: remaining,
        hydration_alert,
        extra_meal_suggestion: None,
        weather,
        last_updated_at: now,
    }
}

/// Clamps calories into range and fills blank fields. Suggestions naming one of
/// the user's allergens are rejected.
pub fn normalize_suggestion(
    raw: AdvisorSuggestion,
    allergies: &[String],
) -> PortResult<MealSuggestion> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_MEAL_TITLE.to_string());

    let lowered = title.to_lowercase();
    if let Some(allergen) = allergies
        .iter()
        .map(|a| a.trim().to_lowercase())
        .find(|a| !a.is_empty() && lowered.contains(a.as_str()))
    {
        return Err(PortError::Unexpected(format!(
            "suggestion '{title}' mentions allergen '{allergen}'"
        )));
    }

    let reason = raw
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "Fits the calories you still have left today.".to_string());

    Ok(MealSuggestion {
        title,
        reason,
        estimated_calories: raw
            .estimated_calories
            .unwrap_or(FALLBACK_MEAL_KCAL)
            .clamp(EXTRA_MEAL_MIN_KCAL, EXTRA_MEAL_MAX_KCAL),
    })
}

pub fn fallback_meal(remaining_calories: i64) -> MealSuggestion {
    MealSuggestion {
        title: FALLBACK_MEAL_TITLE.to_string(),
        reason: format!(
            "A balanced local meal covers part of the {remaining_calories} kcal you still have today."
        ),
        estimated_calories: FALLBACK_MEAL_KCAL,
    }
}

//=========================================================================================
// The Engine
//=========================================================================================

/// Stateless between calls; safe to share across concurrent requests.
#[derive(Clone)]
pub struct TargetAdjustmentEngine {
    weather: Arc<dyn WeatherService>,
    advisor: Option<Arc<dyn MealAdvisorService>>,
}

impl TargetAdjustmentEngine {
    pub fn new(
        weather: Arc<dyn WeatherService>,
        advisor: Option<Arc<dyn MealAdvisorService>>,
    ) -> Self {
        Self { weather, advisor }
    }

    /// Resolves the weather reading for a destination, substituting the default
    /// snapshot for unmapped destinations or provider failures.
    pub async fn weather_report(
        &self,
        destination: &str,
        trip_date: Option<&str>,
        live_weather: Option<WeatherSnapshot>,
    ) -> WeatherReport {
        let now = Utc::now();
        let season = season_context(destination, trip_month(trip_date, now.date_naive()));

        let (source, raw) = match live_weather {
            Some(snapshot) => (WeatherSource::Supplied, snapshot),
            None => match find_destination(destination) {
                Some(found) => match self.weather.current_weather(&found.coordinates).await {
                    Ok(snapshot) => (WeatherSource::Live, snapshot),
                    Err(e) => {
                        warn!("Weather unavailable for '{}', using default: {}", destination, e);
                        (WeatherSource::Default, WeatherSnapshot::default_at(now))
                    }
                },
                None => {
                    debug!("Destination '{}' is unmapped, using default weather", destination);
                    (WeatherSource::Default, WeatherSnapshot::default_at(now))
                }
            },
        };

        WeatherReport {
            destination: destination.to_string(),
            source,
            effective_temperature_c: raw.temperature_c + season.seasonal_heat_boost_c,
            raw,
            season,
        }
    }

    /// Computes today's adjusted targets. Always returns a usable result.
    pub async fn compute_dynamic_targets(
        &self,
        profile: &UserProfile,
        activity: &DailyActivity,
        trip: &Trip,
        live_weather: Option<WeatherSnapshot>,
    ) -> DynamicTargets {
        let weather = self
            .weather_report(&trip.destination, trip.trip_date.as_deref(), live_weather)
            .await;
        let mut targets = compute_targets(profile, activity, weather, Utc::now());

        if targets.remaining_calories >= EXTRA_MEAL_THRESHOLD_KCAL {
            targets.extra_meal_suggestion =
                Some(self.extra_meal(profile, trip, targets.remaining_calories).await);
        }
        targets
    }

    async fn extra_meal(
        &self,
        profile: &UserProfile,
        trip: &Trip,
        remaining_calories: i64,
    ) -> MealSuggestion {
        let Some(advisor) = &self.advisor else {
            return fallback_meal(remaining_calories);
        };

        let request = MealAdvisorRequest {
            destination: trip.destination.clone(),
            remaining_calories,
            allergies: profile.allergies.clone(),
            dietary_preferences: profile.dietary_preferences.clone(),
            already_selected_dish_names: trip.selected_dishes.clone(),
        };

        advisor
            .suggest_extra_meal(&request)
            .await
            .and_then(|raw| normalize_suggestion(raw, &profile.allergies))
            .unwrap_or_else(|e| {
                warn!("Meal advisor failed, using generic suggestion: {}", e);
                fallback_meal(remaining_calories)
            })
    }
}
