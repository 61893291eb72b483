//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher and its normalized record
//! - Dashboard state (ordered city tabs, add/remove, busy flag)
//! - User-facing notifications for dashboard outcomes
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod notification;
pub mod provider;

pub use config::Config;
pub use dashboard::{Dashboard, Phase};
pub use error::{DashboardError, FetchError};
pub use model::{WeatherMetrics, WeatherRecord};
pub use notification::Notification;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
