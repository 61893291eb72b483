use async_trait::async_trait;
use chrono::{Local, TimeZone};
use reqwest::Client;
use serde::Deserialize;
use std::{
    fmt::{self, Display},
    time::Duration,
};
use tracing::{debug, instrument, warn};

use crate::{FetchError, WeatherMetrics, WeatherRecord};

use super::WeatherProvider;

/// m/s to km/h.
const MPS_TO_KMH: f64 = 3.6;

/// OpenWeather "current weather by city name" client.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            endpoint: weather_endpoint(base_url),
            http: Client::new(),
        }
    }

    /// Like [`OpenWeatherProvider::new`], with an optional per-request timeout.
    pub fn with_timeout(
        api_key: String,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            endpoint: weather_endpoint(base_url),
            http: builder.build()?,
        })
    }

    /// Full URL of the current-weather endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn weather_endpoint(base_url: &str) -> String {
    format!("{}/weather", base_url.trim_end_matches('/'))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        debug!(endpoint = %self.endpoint, "Requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // Body is only read for the log line.
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_body(&body), "OpenWeather rejected request");
            return Err(FetchError::NotFound {
                city: city.to_string(),
                status,
            });
        }

        let body = res.text().await?;
        debug!(bytes = body.len(), "OpenWeather response received");

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Malformed(format!("invalid JSON body: {e}")))?;

        normalize(parsed, &Local)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    id: u64,
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    clouds: OwClouds,
    wind: OwWind,
    sys: OwSys,
}

/// Map the provider payload to a [`WeatherRecord`], rendering sun times in `tz`.
fn normalize<Tz>(raw: OwCurrentResponse, tz: &Tz) -> Result<WeatherRecord, FetchError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let condition = raw
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or_else(|| FetchError::Malformed("no weather condition entries".into()))?;

    Ok(WeatherRecord {
        id: raw.id,
        name: raw.name,
        temperature_celsius: round_half_up(raw.main.temp),
        condition,
        metrics: WeatherMetrics {
            humidity_percent: raw.main.humidity,
            cloudiness_percent: raw.clouds.all,
            wind_speed_kmh: round_half_up(raw.wind.speed * MPS_TO_KMH),
            pressure_hpa: raw.main.pressure,
            sunrise_local: format_clock(raw.sys.sunrise, tz)?,
            sunset_local: format_clock(raw.sys.sunset, tz)?,
        },
    })
}

/// Nearest integer, halves toward positive infinity (`-2.5 -> -2`).
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Unix seconds to `h:mm AM/PM` in `tz`.
fn format_clock<Tz>(unix_secs: i64, tz: &Tz) -> Result<String, FetchError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_opt(unix_secs, 0)
        .single()
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .ok_or_else(|| FetchError::Malformed(format!("timestamp out of range: {unix_secs}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
