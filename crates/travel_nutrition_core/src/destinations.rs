//! crates/travel_nutrition_core/src/destinations.rs
//!
//! Static destination tables and the seasonal rules derived from them.

use chrono::{Datelike, NaiveDate};

use crate::domain::{ClimateCategory, Coordinates, SeasonContext};

/// A destination the weather provider can be queried for.
#[derive(Debug, Clone, Copy)]
pub struct Destination {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub coordinates: Coordinates,
    pub category: ClimateCategory,
}

const fn at(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates {
        latitude,
        longitude,
    }
}

pub static DESTINATIONS: &[Destination] = &[
    Destination { name: "Japan", aliases: &["tokyo", "kyoto", "osaka"], coordinates: at(35.6762, 139.6503), category: ClimateCategory::Northern },
    Destination { name: "Italy", aliases: &["rome", "florence", "milan"], coordinates: at(41.9028, 12.4964), category: ClimateCategory::Northern },
    Destination { name: "France", aliases: &["paris", "lyon"], coordinates: at(48.8566, 2.3522), category: ClimateCategory::Northern },
    Destination { name: "Spain", aliases: &["madrid", "barcelona"], coordinates: at(40.4168, -3.7038), category: ClimateCategory::Northern },
    Destination { name: "Greece", aliases: &["athens"], coordinates: at(37.9838, 23.7275), category: ClimateCategory::Northern },
    Destination { name: "Mexico", aliases: &["mexico city", "cancun"], coordinates: at(19.4326, -99.1332), category: ClimateCategory::Northern },
    Destination { name: "United States", aliases: &["usa", "new york"], coordinates: at(40.7128, -74.0060), category: ClimateCategory::Northern },
    Destination { name: "United Kingdom", aliases: &["uk", "london"], coordinates: at(51.5074, -0.1278), category: ClimateCategory::Northern },
    Destination { name: "Morocco", aliases: &["marrakech"], coordinates: at(31.6295, -7.9811), category: ClimateCategory::Northern },
    Destination { name: "Thailand", aliases: &["bangkok", "phuket"], coordinates: at(13.7563, 100.5018), category: ClimateCategory::Tropical },
    Destination { name: "Vietnam", aliases: &["hanoi", "ho chi minh city"], coordinates: at(21.0278, 105.8342), category: ClimateCategory::Tropical },
    Destination { name: "Singapore", aliases: &[], coordinates: at(1.3521, 103.8198), category: ClimateCategory::Tropical },
    Destination { name: "India", aliases: &["delhi", "mumbai"], coordinates: at(28.6139, 77.2090), category: ClimateCategory::Tropical },
    Destination { name: "Indonesia", aliases: &["bali", "jakarta"], coordinates: at(-8.3405, 115.0920), category: ClimateCategory::Tropical },
    Destination { name: "Australia", aliases: &["sydney", "melbourne"], coordinates: at(-33.8688, 151.2093), category: ClimateCategory::Southern },
    Destination { name: "Brazil", aliases: &["rio de janeiro", "sao paulo"], coordinates: at(-22.9068, -43.1729), category: ClimateCategory::Southern },
    Destination { name: "Argentina", aliases: &["buenos aires"], coordinates: at(-34.6037, -58.3816), category: ClimateCategory::Southern },
    Destination { name: "Peru", aliases: &["lima", "cusco"], coordinates: at(-12.0464, -77.0428), category: ClimateCategory::Southern },
    Destination { name: "South Africa", aliases: &["cape town"], coordinates: at(-33.9249, 18.4241), category: ClimateCategory::Southern },
];

/// Case-insensitive lookup by canonical name or alias.
pub fn find_destination(query: &str) -> Option<&'static Destination> {
    let key = query.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    DESTINATIONS.iter().find(|d| {
        d.name.to_lowercase() == key || d.aliases.iter().any(|alias| *alias == key)
    })
}

const NORTHERN_SUMMER: [u32; 3] = [6, 7, 8];
const NORTHERN_WINTER: [u32; 3] = [12, 1, 2];

/// Builds the season context for a destination and calendar month.
///
/// Unmapped destinations follow the northern-hemisphere rule.
pub fn season_context(destination: &str, month: u32) -> SeasonContext {
    let found = find_destination(destination);
    let category = found.map_or(ClimateCategory::Northern, |d| d.category);

    let seasonal_heat_boost_c = match category {
        ClimateCategory::Tropical => 2.0,
        ClimateCategory::Southern if NORTHERN_WINTER.contains(&month) => 5.0,
        ClimateCategory::Southern if NORTHERN_SUMMER.contains(&month) => -2.0,
        ClimateCategory::Southern => 1.0,
        ClimateCategory::Northern if NORTHERN_SUMMER.contains(&month) => 4.0,
        ClimateCategory::Northern if NORTHERN_WINTER.contains(&month) => -2.0,
        ClimateCategory::Northern => 0.0,
    };

    // Tropical destinations take their summer from the hemisphere they sit in.
    let southern_hemisphere = match category {
        ClimateCategory::Southern => true,
        ClimateCategory::Northern => false,
        ClimateCategory::Tropical => found.is_some_and(|d| d.coordinates.latitude < 0.0),
    };
    let summer_months = if southern_hemisphere {
        NORTHERN_WINTER
    } else {
        NORTHERN_SUMMER
    };

    SeasonContext {
        category,
        month,
        is_summer_locally: summer_months.contains(&month),
        seasonal_heat_boost_c,
    }
}

/// Resolves the trip month, falling back to `today` for missing or unparseable dates.
pub fn trip_month(trip_date: Option<&str>, today: NaiveDate) -> u32 {
    trip_date
        .and_then(parse_trip_date)
        .unwrap_or(today)
        .month()
}

fn parse_trip_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}
