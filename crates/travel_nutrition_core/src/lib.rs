pub mod destinations;
pub mod domain;
pub mod engine;
pub mod ports;

pub use domain::{
    AlertKind, ClimateCategory, Coordinates, DailyActivity, DynamicTargets, HydrationAlert,
    LoggedMeal, MealSuggestion, SeasonContext, TargetDeltas, Trip, UserProfile, WeatherReport,
    WeatherSnapshot, WeatherSource,
};
pub use engine::TargetAdjustmentEngine;
pub use ports::{
    AdvisorSuggestion, MealAdvisorRequest, MealAdvisorService, PortError, PortResult,
    WeatherService,
};
