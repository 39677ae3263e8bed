//! services/api/src/adapters/weather.rs
//!
//! This module contains the adapter for the Open-Meteo current-conditions API.
//! It implements the `WeatherService` port from the `core` crate.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use travel_nutrition_core::{
    domain::{Coordinates, WeatherSnapshot},
    ports::{PortError, PortResult, WeatherService},
};

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code";

//=========================================================================================
// Open-Meteo Response Models
//=========================================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: Option<f64>,
    relative_humidity_2m: f64,
    #[serde(default)]
    weather_code: i32,
}

impl From<CurrentConditions> for WeatherSnapshot {
    fn from(current: CurrentConditions) -> Self {
        Self {
            temperature_c: current.temperature_2m,
            apparent_temperature_c: current
                .apparent_temperature
                .unwrap_or(current.temperature_2m),
            humidity_percent: current.relative_humidity_2m,
            weather_code: current.weather_code,
            fetched_at: Utc::now(),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `WeatherService` using the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeatherAdapter {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeatherAdapter {
    /// Creates a new `OpenMeteoWeatherAdapter` pointed at `base_url`.
    pub fn new(base_url: String) -> PortResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("travel-nutrition/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

/// Decodes an Open-Meteo forecast body into a snapshot.
fn parse_forecast(body: &str) -> PortResult<WeatherSnapshot> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| PortError::Unexpected(format!("Malformed weather response: {}", e)))?;
    Ok(response.current.into())
}

//=========================================================================================
// `WeatherService` Trait Implementation
//=========================================================================================

#[async_trait]
impl WeatherService for OpenMeteoWeatherAdapter {
    async fn current_weather(&self, coordinates: &Coordinates) -> PortResult<WeatherSnapshot> {
        let response = self
            .client
            .get(self.forecast_url())
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Weather API request failed: {}", e);
                PortError::Unexpected(format!("Weather API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Weather API returned {}", status);
            return Err(PortError::Unexpected(format!(
                "Weather API returned error: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        parse_forecast(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_conditions() {
        let body = r#"{
            "latitude": 35.7,
            "longitude": 139.69,
            "current": {
                "time": "2026-07-15T12:00",
                "interval": 900,
                "temperature_2m": 31.4,
                "apparent_temperature": 36.2,
                "relative_humidity_2m": 78,
                "weather_code": 2
            }
        }"#;
        let snapshot = parse_forecast(body).unwrap();
        assert_eq!(snapshot.temperature_c, 31.4);
        assert_eq!(snapshot.apparent_temperature_c, 36.2);
        assert_eq!(snapshot.humidity_percent, 78.0);
        assert_eq!(snapshot.weather_code, 2);
    }

    #[test]
    fn missing_apparent_temperature_falls_back_to_air_temperature() {
        let body = r#"{"current": {"temperature_2m": 12.0, "relative_humidity_2m": 40}}"#;
        let snapshot = parse_forecast(body).unwrap();
        assert_eq!(snapshot.apparent_temperature_c, 12.0);
        assert_eq!(snapshot.weather_code, 0);
    }

    #[test]
    fn malformed_bodies_are_port_errors() {
        let err = parse_forecast(r#"{"error": true, "reason": "bad latitude"}"#).unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[test]
    fn forecast_url_joins_the_base() {
        let adapter = OpenMeteoWeatherAdapter::new("http://localhost:8089".to_string()).unwrap();
        assert_eq!(adapter.forecast_url(), "http://localhost:8089/v1/forecast");
    }
}
