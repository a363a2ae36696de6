//! Integration tests for OpenWeatherProvider using wiremock.

use std::time::Duration;

use weather_core::{
    Endpoints, LocationQuery, OpenWeatherProvider, ProviderError, ProviderSettings,
    WeatherProvider, to_daily_series, to_hourly_series, to_monthly_series,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    let settings = ProviderSettings {
        api_key: "TEST_KEY".to_string(),
        endpoints: Endpoints { base_url: server.uri(), climate_url: server.uri() },
        timeout: Duration::from_secs(5),
    };
    OpenWeatherProvider::new(settings).unwrap()
}

fn forecast_entry(dt: i64, temp: f64, code: u16, pop: f64) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": {"temp": temp, "temp_min": temp - 1.0, "temp_max": temp + 1.0, "humidity": 60},
        "weather": [{"id": code, "main": "x", "description": format!("code {code}"), "icon": "01d"}],
        "pop": pop
    })
}

#[tokio::test]
async fn test_current_by_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "dt": 1700000000,
            "timezone": 0,
            "main": {"temp": 11.5, "feels_like": 10.0, "humidity": 77},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "wind": {"speed": 4.1},
            "sys": {"country": "GB"}
        })))
        .mount(&mock_server)
        .await;

    let current = provider(&mock_server)
        .current(&LocationQuery::City("London".into()))
        .await
        .unwrap();

    assert_eq!(current.location.display_name(), "London, GB");
    assert_eq!(current.sample.temperature, 11.5);
    assert_eq!(current.sample.condition.unwrap().code, 803);
    assert_eq!(current.wind_speed_mps, 4.1);
}

#[tokio::test]
async fn test_current_by_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "50.45"))
        .and(query_param("lon", "30.52"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Kyiv", "dt": 1, "main": {"temp": 3.0}
        })))
        .mount(&mock_server)
        .await;

    let query = LocationQuery::Coords(weather_core::Coordinates { lat: 50.45, lon: 30.52 });
    let current = provider(&mock_server).current(&query).await.unwrap();

    assert_eq!(current.location.name, "Kyiv");
    assert!(current.sample.condition.is_none());
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let cases: [(u16, &str); 4] = [
        (404, "not found"),
        (429, "rate limited"),
        (503, "unavailable"),
        (401, "unauthorized"),
    ];

    for (status, label) in cases {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(status).set_body_string("{\"message\":\"x\"}"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current(&LocationQuery::City("Nowhere".into()))
            .await
            .unwrap_err();

        let ok = match status {
            404 => matches!(err, ProviderError::NotFound),
            429 => matches!(err, ProviderError::RateLimited),
            503 => matches!(err, ProviderError::Unavailable { status: 503 }),
            401 => matches!(err, ProviderError::Unauthorized { status: 401 }),
            _ => false,
        };
        assert!(ok, "{label}: got {err:?}");
    }
}

#[tokio::test]
async fn test_blank_city_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .forecast(&LocationQuery::City("   ".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_forecast_feeds_normalizer() {
    let mock_server = MockServer::start().await;
    let start = 1_704_067_200; // 2024-01-01T00:00:00Z
    let list: Vec<_> = (0..40)
        .map(|i| forecast_entry(start + i * 10_800, 10.0 + i as f64, 800, 0.1))
        .collect();

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Reykjavik", "country": "IS", "timezone": 0},
            "list": list
        })))
        .mount(&mock_server)
        .await;

    let forecast = provider(&mock_server)
        .forecast(&LocationQuery::City("Reykjavik".into()))
        .await
        .unwrap();

    assert_eq!(forecast.samples.len(), 40);

    let tz = forecast.location.utc_offset();
    let daily = to_daily_series(&forecast.samples, &tz);
    assert_eq!(daily.len(), 5);
    assert_eq!(daily[0].timestamp, start + 12 * 3600);

    let hourly = to_hourly_series(&forecast.samples, start);
    assert_eq!(hourly.len(), 22);
    assert_eq!(hourly[1].timestamp, start + 3600);
}

#[tokio::test]
async fn test_suggest_is_limited_to_five() {
    let mock_server = MockServer::start().await;
    let entries: Vec<_> = (0..7)
        .map(|i| serde_json::json!({"name": format!("Springfield {i}"), "country": "US", "state": "IL", "lat": 39.8, "lon": -89.6}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Spring"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(&mock_server)
        .await;

    let suggestions = provider(&mock_server).suggest("Spring").await.unwrap();

    assert_eq!(suggestions.len(), 5);
    assert_eq!(suggestions[0].label(), "Springfield 0, IL, US");
}

#[tokio::test]
async fn test_climate_list_variants() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast/climate"))
        .and(query_param("q", "Oslo"))
        .and(query_param("cnt", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Oslo", "country": "NO"},
            "list": [
                {"dt": 1704110400, "temp": {"day": -3.0, "min": -8.0, "max": -1.0}, "humidity": 90,
                 "weather": [{"id": 600, "description": "light snow", "icon": "13d"}]},
                {"dt": 1704196800, "temp": {"average": -5.0}}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast/climate"))
        .and(query_param("q", "Bergen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Bergen"},
            "list": "not a list"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server);

    let oslo = provider.climate(&LocationQuery::City("Oslo".into())).await.unwrap();
    let monthly = to_monthly_series(oslo.list.as_deref());
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].temperature, -3.0);
    assert_eq!(monthly[0].condition.as_ref().unwrap().code, 600);
    assert_eq!(monthly[1].temperature, -5.0);
    assert!(monthly[1].condition.is_none());

    let bergen = provider.climate(&LocationQuery::City("Bergen".into())).await.unwrap();
    assert!(bergen.list.is_none());
    assert!(to_monthly_series(bergen.list.as_deref()).is_empty());
}

#[tokio::test]
async fn test_climate_skips_malformed_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast/climate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Tromso", "country": "NO"},
            "list": [
                {"dt": 1704110400, "temp": {"day": -7.0}, "humidity": 80},
                {"dt": 1704196800, "temp": {"day": -9.0}, "humidity": 55.5},
                {"temp": {"day": -4.0}},
                {"dt": 1704369600, "temp": {"day": -6.0}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let climate = provider(&mock_server)
        .climate(&LocationQuery::City("Tromso".into()))
        .await
        .unwrap();

    let list = climate.list.unwrap();
    let days: Vec<i64> = list.iter().map(|s| s.dt).collect();
    assert_eq!(days, vec![1704110400, 1704369600]);

    let monthly = to_monthly_series(Some(&list));
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[1].temperature, -6.0);
}
