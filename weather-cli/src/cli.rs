use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, Dashboard, Notification, notification::Action, provider_from_config,
};

use crate::{interactive, progress::with_spinner, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// OpenWeather API key. Overrides the config file and OPENWEATHER_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Defaults to `dashboard`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default city.
    Configure,

    /// Open the interactive dashboard.
    Dashboard {
        /// City to seed the dashboard with instead of the configured default.
        #[arg(long)]
        city: Option<String>,
    },

    /// Print weather cards for one or more cities and exit.
    Show {
        /// City names, e.g. "London" "Paris".
        #[arg(required = true)]
        cities: Vec<String>,
    },
}

/// Log filter used when RUST_LOG is not set.
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            api_key, command, ..
        } = self;

        match command.unwrap_or(Command::Dashboard { city: None }) {
            Command::Configure => configure(),
            Command::Dashboard { city } => {
                let config = load_config(api_key)?;
                let provider = provider_from_config(&config)
                    .context("Failed to build the OpenWeather client")?;
                let dashboard = Dashboard::new(provider)
                    .with_default_city(city.unwrap_or(config.default_city));
                interactive::run(dashboard).await
            }
            Command::Show { cities } => show(load_config(api_key)?, &cities).await,
        }
    }
}

fn load_config(api_key: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        config.set_api_key(key);
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    // Read the file directly so an environment key doesn't get persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.default_city = default_city.trim().to_string();
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(config: Config, cities: &[String]) -> anyhow::Result<()> {
    let provider =
        provider_from_config(&config).context("Failed to build the OpenWeather client")?;
    let mut dashboard = Dashboard::new(provider);
    let today = Local::now().date_naive();
    let mut failures = 0;

    for city in cities {
        let busy = dashboard.subscribe_busy();
        let message = format!("Fetching {}...", city.trim());
        match with_spinner(busy, &message, dashboard.add_city(city)).await {
            Ok(record) => println!("{}", render::card(record, today)),
            Err(err) => {
                failures += 1;
                tracing::debug!(city = %city, error = %err, "show failed");
                eprintln!("{city}: {}", Notification::for_error(Action::AddCity, &err));
            }
        }
    }

    if failures == cities.len() {
        bail!("No weather data could be fetched");
    }
    Ok(())
}
