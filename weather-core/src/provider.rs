use crate::{Config, FetchError, WeatherRecord, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current weather, one city per call.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and normalize current weather for `city`. Exactly one attempt.
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not treated as an error: the provider is still built
/// and the provider's rejection surfaces as a fetch failure.
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherProvider, FetchError> {
    let api_key = match config.api_key() {
        Some(key) => key.to_owned(),
        None => {
            tracing::warn!(
                "No OpenWeather API key configured; requests will be rejected. \
                 Hint: run `weather configure` or set {}.",
                crate::config::API_KEY_ENV
            );
            String::new()
        }
    };

    OpenWeatherProvider::with_timeout(api_key, &config.base_url, config.timeout())
}
