use serde::{Deserialize, Serialize};

/// Normalized current weather for one city, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Provider-assigned city id. Unique within a dashboard.
    pub id: u64,
    /// City name as spelled by the provider, not necessarily the user's input.
    pub name: String,
    pub temperature_celsius: i32,
    /// Primary weather category, e.g. "Clouds" or "Rain".
    pub condition: String,
    pub metrics: WeatherMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherMetrics {
    pub humidity_percent: u8,
    pub cloudiness_percent: u8,
    pub wind_speed_kmh: i32,
    pub pressure_hpa: u32,
    /// Local time, `h:mm AM/PM`.
    pub sunrise_local: String,
    /// Local time, `h:mm AM/PM`.
    pub sunset_local: String,
}

impl WeatherRecord {
    /// Case-insensitive name comparison used for duplicate detection.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
