use cafe_forecast::error::FetchError;
use cafe_forecast::fetcher::{Fetcher, ForecastRequest};
use cafe_forecast::rain::RainGroup;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(days: u32) -> ForecastRequest {
    ForecastRequest {
        horizon_days: days,
        ..ForecastRequest::default()
    }
}

fn three_day_payload() -> serde_json::Value {
    json!({
        "latitude": 55.68,
        "longitude": 12.56,
        "timezone": "Europe/Copenhagen",
        "daily_units": {"time": "iso8601", "sunshine_duration": "s"},
        "daily": {
            "time": ["2025-07-04", "2025-07-05", "2025-07-06"],
            "temperature_2m_max": [24.1, 20.0, 17.2],
            "precipitation_sum": [0.0, 4.0, 25.3],
            "wind_speed_10m_max": [3.5, 5.0, 11.2],
            "sunshine_duration": [43200.0, 28800.0, 3600.0]
        }
    })
}

/// Test that the request carries the expected query parameters
#[tokio::test]
async fn test_fetcher_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "55.6761"))
        .and(query_param("longitude", "12.5683"))
        .and(query_param(
            "daily",
            "temperature_2m_max,precipitation_sum,wind_speed_10m_max,sunshine_duration",
        ))
        .and(query_param("forecast_days", "3"))
        .and(query_param("timezone", "Europe/Copenhagen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_day_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri()).expect("Failed to create fetcher");
    let observations = fetcher
        .fetch_forecast(&request(3))
        .await
        .expect("Fetch failed");

    assert_eq!(observations.len(), 3);
    assert_eq!(observations[0].date.to_string(), "2025-07-04");
    assert_eq!(observations[0].weekday, 5);
    assert_eq!(observations[1].weekday, 6);
    assert_eq!(observations[2].weekday, 7);
    assert_eq!(observations[0].month, 7);
    assert_eq!(observations[0].year, 2025);
    assert!((observations[0].sunshine_hours - 12.0).abs() < 1e-12);
    assert_eq!(observations[0].rain_group, RainGroup::Dry);
    assert_eq!(observations[1].rain_group, RainGroup::Moderate);
    assert_eq!(observations[2].rain_group, RainGroup::Extreme);
}

/// Test that a server error is surfaced without retrying
#[tokio::test]
async fn test_fetcher_fails_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri()).expect("Failed to create fetcher");
    let result = fetcher.fetch_forecast(&request(3)).await;

    match result.unwrap_err() {
        FetchError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        e => panic!("Expected Status error, got: {:?}", e),
    }
}

/// Test that a payload without sunshine duration is rejected
#[tokio::test]
async fn test_fetcher_fails_on_missing_series() {
    let mock_server = MockServer::start().await;

    let mut payload = three_day_payload();
    payload["daily"]
        .as_object_mut()
        .expect("daily object")
        .remove("sunshine_duration");

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri()).expect("Failed to create fetcher");
    let result = fetcher.fetch_forecast(&request(3)).await;

    match result.unwrap_err() {
        FetchError::Payload(msg) => assert!(msg.contains("sunshine_duration")),
        e => panic!("Expected Payload error, got: {:?}", e),
    }
}

/// Test that a non-JSON body is a payload error
#[tokio::test]
async fn test_fetcher_fails_on_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&mock_server.uri()).expect("Failed to create fetcher");
    let result = fetcher.fetch_forecast(&request(3)).await;

    assert!(matches!(result, Err(FetchError::Payload(_))));
}

/// Test that a configured timeout turns a slow provider into a transport error
#[tokio::test]
async fn test_fetcher_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(three_day_payload())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::with_timeout(&mock_server.uri(), Some(Duration::from_millis(200)))
        .expect("Failed to create fetcher");
    let result = fetcher.fetch_forecast(&request(3)).await;

    match result.unwrap_err() {
        FetchError::Http(e) => assert!(e.is_timeout()),
        e => panic!("Expected Http error, got: {:?}", e),
    }
}

/// Test that an unreachable provider is a transport error
#[tokio::test]
async fn test_fetcher_fails_when_unreachable() {
    let fetcher = Fetcher::new("http://127.0.0.1:9").expect("Failed to create fetcher");
    let result = fetcher.fetch_forecast(&request(3)).await;

    assert!(matches!(result, Err(FetchError::Http(_))));
}

/// Test that a trailing slash on the base URL is tolerated
#[tokio::test]
async fn test_fetcher_trims_trailing_slash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_day_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(&format!("{}/", mock_server.uri())).expect("Failed to create fetcher");
    assert!(fetcher.fetch_forecast(&request(3)).await.is_ok());
}
