//! Integration tests for the OpenWeather fetcher and the dashboard using wiremock
//!
//! These tests run the real HTTP client against a mock server, covering the
//! request shape, the response mapping and the failure taxonomy.

use std::time::Duration;

use weather_core::{
    Config, Dashboard, DashboardError, FetchError, OpenWeatherProvider, Phase, WeatherProvider,
    provider_from_config,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";

fn london_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [ { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" } ],
        "base": "stations",
        "main": { "temp": 15.4, "feels_like": 14.8, "temp_min": 14.1, "temp_max": 16.2, "pressure": 1012, "humidity": 70 },
        "visibility": 10000,
        "wind": { "speed": 4.1, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1700020000,
        "sys": { "type": 2, "id": 2075535, "country": "GB", "sunrise": 1700000000, "sunset": 1700040000 },
        "timezone": 0,
        "id": 2643743,
        "name": "London",
        "cod": 200
    })
}

fn new_york_response() -> serde_json::Value {
    serde_json::json!({
        "weather": [ { "main": "Clear" } ],
        "main": { "temp": -2.5, "pressure": 1021, "humidity": 45 },
        "wind": { "speed": 2.5 },
        "clouds": { "all": 0 },
        "sys": { "sunrise": 1700049000, "sunset": 1700085000 },
        "id": 5128581,
        "name": "New York"
    })
}

fn create_test_provider(mock_server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(API_KEY.to_string(), &mock_server.uri())
}

async fn mount_city(mock_server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", city))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

fn looks_like_clock(value: &str) -> bool {
    let Some((time, meridiem)) = value.split_once(' ') else {
        return false;
    };
    let Some((hour, minute)) = time.split_once(':') else {
        return false;
    };
    let hour_ok = hour.parse::<u8>().is_ok_and(|h| (1..=12).contains(&h)) && !hour.starts_with('0');
    let minute_ok = minute.len() == 2 && minute.parse::<u8>().is_ok_and(|m| m < 60);
    hour_ok && minute_ok && matches!(meridiem, "AM" | "PM")
}

// ============================================================================
// Fetcher
// ============================================================================

#[tokio::test]
async fn fetch_sends_city_key_and_metric_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let record = provider.fetch("London").await.unwrap();

    assert_eq!(record.id, 2643743);
    assert_eq!(record.name, "London");
    assert_eq!(record.temperature_celsius, 15);
    assert_eq!(record.condition, "Clouds");
    assert_eq!(record.metrics.wind_speed_kmh, 15);
    assert_eq!(record.metrics.humidity_percent, 70);
    assert_eq!(record.metrics.cloudiness_percent, 75);
    assert_eq!(record.metrics.pressure_hpa, 1012);
    assert!(looks_like_clock(&record.metrics.sunrise_local), "{}", record.metrics.sunrise_local);
    assert!(looks_like_clock(&record.metrics.sunset_local), "{}", record.metrics.sunset_local);
}

#[tokio::test]
async fn fetch_rounds_negative_halves_up() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "New York",
        ResponseTemplate::new(200).set_body_json(new_york_response()),
    )
    .await;

    let record = create_test_provider(&mock_server).fetch("New York").await.unwrap();

    assert_eq!(record.temperature_celsius, -2);
    assert_eq!(record.metrics.wind_speed_kmh, 9);
}

#[tokio::test]
async fn fetch_encodes_non_ascii_city_names() {
    let mock_server = MockServer::start().await;
    let mut body = london_response();
    body["name"] = "São Paulo".into();
    body["id"] = 3448439.into();
    mount_city(&mock_server, "São Paulo", ResponseTemplate::new(200).set_body_json(body)).await;

    let record = create_test_provider(&mock_server).fetch("São Paulo").await.unwrap();
    assert_eq!(record.name, "São Paulo");
}

#[tokio::test]
async fn fetch_404_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "Zzzzz",
        ResponseTemplate::new(404)
            .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
    )
    .await;

    let err = create_test_provider(&mock_server).fetch("Zzzzz").await.unwrap_err();

    match err {
        FetchError::NotFound { city, status } => {
            assert_eq!(city, "Zzzzz");
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_treats_every_non_success_status_as_not_found() {
    for code in [401u16, 429, 500, 503] {
        let mock_server = MockServer::start().await;
        mount_city(&mock_server, "London", ResponseTemplate::new(code)).await;

        let err = create_test_provider(&mock_server).fetch("London").await.unwrap_err();
        assert!(
            matches!(err, FetchError::NotFound { status, .. } if status.as_u16() == code),
            "status {code}"
        );
    }
}

#[tokio::test]
async fn fetch_invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
    )
    .await;

    let err = create_test_provider(&mock_server).fetch("London").await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));
}

#[tokio::test]
async fn fetch_missing_fields_is_malformed() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1, "name": "London" })),
    )
    .await;

    let err = create_test_provider(&mock_server).fetch("London").await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));
}

#[tokio::test]
async fn fetch_connection_refused_is_network_error() {
    // MockServer instances are pooled and keep listening, so reserve and
    // release a plain port instead.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let provider = OpenWeatherProvider::new(API_KEY.to_string(), &uri);
    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn network_errors_do_not_expose_the_api_key() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let secret = "SUPER_SECRET_KEY";

    let provider = OpenWeatherProvider::new(secret.to_string(), &uri);
    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(!err.to_string().contains(secret), "{err}");
    assert!(!format!("{err:?}").contains(secret), "{err:?}");

    let mut dash = Dashboard::new(OpenWeatherProvider::new(secret.to_string(), &uri));
    let err = dash.initialize().await.unwrap_err();
    assert!(!err.to_string().contains(secret), "{err}");
}

#[tokio::test]
async fn configured_timeout_cuts_off_slow_responses() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200)
            .set_body_json(london_response())
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let config = Config {
        api_key: Some(API_KEY.into()),
        base_url: mock_server.uri(),
        timeout_secs: Some(1),
        ..Config::default()
    };
    let provider = provider_from_config(&config).unwrap();

    let err = provider.fetch("London").await.unwrap_err();
    assert!(!err.to_string().contains(API_KEY), "{err}");
    match err {
        FetchError::Network(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_surfaces_as_fetch_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("appid", ""))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let config = Config {
        base_url: mock_server.uri(),
        ..Config::default()
    };
    let provider = provider_from_config(&config).unwrap();

    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound { status, .. } if status.as_u16() == 401));
}

// ============================================================================
// Dashboard over HTTP
// ============================================================================

#[tokio::test]
async fn dashboard_seeds_adds_and_rejects_unknown_city() {
    let mock_server = MockServer::start().await;
    mount_city(
        &mock_server,
        "New York",
        ResponseTemplate::new(200).set_body_json(new_york_response()),
    )
    .await;
    mount_city(
        &mock_server,
        "London",
        ResponseTemplate::new(200).set_body_json(london_response()),
    )
    .await;
    mount_city(&mock_server, "Zzzzz", ResponseTemplate::new(404)).await;

    let mut dash = Dashboard::new(create_test_provider(&mock_server));
    assert_eq!(dash.phase(), Phase::Loading);

    let seeded = dash.initialize().await.unwrap();
    assert_eq!(seeded.name, "New York");
    assert_eq!(dash.phase(), Phase::Ready);

    dash.add_city("London").await.unwrap();
    let before = dash.records().to_vec();

    let err = dash.add_city("Zzzzz").await.unwrap_err();
    assert!(matches!(err, DashboardError::Fetch(FetchError::NotFound { .. })));
    assert_eq!(dash.records(), before.as_slice());

    let err = dash.add_city("london").await.unwrap_err();
    assert!(matches!(err, DashboardError::DuplicateCity { .. }));
    assert_eq!(dash.len(), 2);
}

#[tokio::test]
async fn dashboard_seed_failure_leaves_it_empty_but_ready() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "New York", ResponseTemplate::new(500)).await;

    let mut dash = Dashboard::new(create_test_provider(&mock_server));
    assert!(dash.initialize().await.is_err());

    assert_eq!(dash.phase(), Phase::Ready);
    assert!(dash.is_empty());
    assert!(!dash.is_busy());
}
