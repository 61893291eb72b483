//! Plain-text rendering of the dashboard: tab strip and weather card.

use chrono::NaiveDate;
use weather_core::WeatherRecord;

const RULE_WIDTH: usize = 40;

/// Tab strip with the selected city in brackets.
pub fn tabs_line(records: &[WeatherRecord], selected: Option<u64>) -> String {
    records
        .iter()
        .map(|r| {
            if Some(r.id) == selected {
                format!("[{}]", r.name)
            } else {
                format!(" {} ", r.name)
            }
        })
        .collect::<Vec<_>>()
        .join("│")
}

/// Label/value pairs of the metric tiles, in display order.
pub fn metric_tiles(record: &WeatherRecord) -> [(&'static str, String); 4] {
    let m = &record.metrics;
    [
        ("Humidity", format!("{}%", m.humidity_percent)),
        ("Cloudiness", format!("{}%", m.cloudiness_percent)),
        ("Wind Speed", format!("{} km/h", m.wind_speed_kmh)),
        ("Pressure", format!("{} hPa", m.pressure_hpa)),
    ]
}

/// Full weather card for one city, dated `today`.
pub fn card(record: &WeatherRecord, today: NaiveDate) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!("{}\n", record.name));
    out.push_str(&format!("{}\n\n", today.format("%A, %B %-d, %Y")));
    out.push_str(&format!(
        "  {}°  {}\n\n",
        record.temperature_celsius, record.condition
    ));

    for (label, value) in metric_tiles(record) {
        out.push_str(&format!("  {label:<12}{value}\n"));
    }

    out.push_str(&format!(
        "\n  Sunrise {}  ···  Sunset {}\n",
        record.metrics.sunrise_local, record.metrics.sunset_local
    ));
    out.push_str(&rule);
    out
}

pub fn empty_dashboard() -> &'static str {
    "No city selected. Add a city to get started."
}
