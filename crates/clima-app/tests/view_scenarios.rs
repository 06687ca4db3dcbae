//! End-to-end orchestrator scenarios against a mock weather API.
//!
//! These exercise the all-or-nothing search contract and the best-effort
//! forecast fetch after geolocation.

use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clima_app::{
    AppError, Coordinates, LocationError, LocationProvider, Permission, PositionOptions,
    SearchHistory, ViewState, WeatherView,
};
use clima_core::MemoryStore;
use clima_weather::WeatherClient;

/// Locator with scripted permission and position answers.
struct StubLocator {
    check: Permission,
    request: Permission,
    position: Result<Coordinates, LocationError>,
}

impl StubLocator {
    fn granted(lat: f64, lon: f64) -> Self {
        Self {
            check: Permission::Granted,
            request: Permission::Granted,
            position: Ok(Coordinates {
                latitude: lat,
                longitude: lon,
            }),
        }
    }

    fn denied() -> Self {
        Self {
            check: Permission::Denied,
            request: Permission::Denied,
            position: Err(LocationError::PermissionDenied),
        }
    }

    fn failing(error: LocationError) -> Self {
        Self {
            check: Permission::Granted,
            request: Permission::Granted,
            position: Err(error),
        }
    }
}

#[async_trait::async_trait]
impl LocationProvider for StubLocator {
    async fn check_permission(&self) -> Permission {
        self.check
    }

    async fn request_permission(&self) -> Permission {
        self.request
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        self.position
    }
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "sys": { "country": "XX" },
        "dt": chrono::Utc::now().timestamp(),
        "main": { "temp": 18.4, "feels_like": 17.9, "humidity": 55, "pressure": 1012 },
        "weather": [{ "main": "Clear", "description": "cielo claro" }],
        "wind": { "speed": 2.5, "deg": 120.0 }
    })
}

/// A realistic 5-day feed: 40 samples at 3-hour spacing starting now.
fn forecast_body(name: &str) -> serde_json::Value {
    let start = chrono::Utc::now().timestamp();
    let list: Vec<_> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": start + i * 3 * 3600,
                "main": { "temp": 12.0 + (i % 9) as f64, "feels_like": 11.0,
                          "humidity": 60, "pressure": 1010 },
                "weather": [{ "main": "Clouds", "description": "nubes" }]
            })
        })
        .collect();
    serde_json::json!({ "list": list, "city": { "name": name, "country": "XX" } })
}

fn view_against(server: &MockServer, locator: Arc<dyn LocationProvider>) -> WeatherView {
    let client = WeatherClient::new(&server.uri(), "test-key", "es").unwrap();
    let history = SearchHistory::load(Arc::new(MemoryStore::new()));
    WeatherView::new(client, locator, history)
}

#[tokio::test]
async fn successful_search_fills_all_three_views() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Madrid")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Madrid")))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::denied()));
    view.search("Madrid").await.unwrap();

    assert_eq!(view.state(), ViewState::Success);
    assert_eq!(view.current().unwrap().name, "Madrid");
    assert!(!view.daily().is_empty());
    assert!(view.daily().len() <= 5);
    assert_eq!(view.hourly().len(), 8);
    assert!(view.error_message().is_none());
    assert_eq!(view.recent_searches(), ["Madrid"]);
}

#[tokio::test]
async fn one_failed_fetch_discards_the_whole_search() {
    // Current weather succeeds but the forecast fetch fails: the search is
    // all-or-nothing, so nothing is displayed.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "message": "service unavailable"
        })))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::denied()));
    let result = view.search("Paris").await;

    assert!(matches!(result, Err(AppError::Weather(_))));
    assert_eq!(view.state(), ViewState::Failed);
    assert!(view.current().is_none());
    assert!(view.daily().is_empty());
    assert!(view.hourly().is_empty());
    assert!(view.error_message().unwrap().contains("service unavailable"));
    assert!(view.recent_searches().is_empty());
}

#[tokio::test]
async fn unknown_city_surfaces_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "ciudad no encontrada"
        })))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::denied()));
    let result = view.search("Atlantis").await;

    match result {
        Err(AppError::Weather(clima_weather::WeatherError::NotFound(message))) => {
            assert_eq!(message, "ciudad no encontrada");
        }
        other => panic!("expected NotFound, got {:?}", other.is_ok()),
    }
    assert_eq!(view.state(), ViewState::Failed);
    // The provider's own wording reaches the display text
    let displayed = view.error_message().unwrap();
    assert!(
        displayed.contains("ciudad no encontrada"),
        "server message missing from {:?}",
        displayed
    );
}

#[tokio::test]
async fn geolocation_keeps_current_weather_when_forecast_fails() {
    // The resolved-city forecast is best-effort: its failure is swallowed
    // and current conditions stay on display.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "35.68"))
        .and(query_param("lon", "139.69"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Tokyo")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "internal error"
        })))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::granted(35.68, 139.69)));
    view.locate().await.unwrap();

    assert_eq!(view.state(), ViewState::Success);
    assert_eq!(view.current().unwrap().name, "Tokyo");
    assert!(view.daily().is_empty());
    assert!(view.hourly().is_empty());
    assert!(view.error_message().is_none());
    assert_eq!(view.recent_searches(), ["Tokyo"]);
}

#[tokio::test]
async fn geolocation_success_fills_forecast_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Tokyo")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Tokyo")))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::granted(35.68, 139.69)));
    view.locate().await.unwrap();

    assert_eq!(view.state(), ViewState::Success);
    assert!(!view.daily().is_empty());
    assert_eq!(view.hourly().len(), 8);
}

#[tokio::test]
async fn permission_denial_fails_without_any_fetch() {
    let server = MockServer::start().await;

    let mut view = view_against(&server, Arc::new(StubLocator::denied()));
    let result = view.locate().await;

    assert!(matches!(
        result,
        Err(AppError::Location(LocationError::PermissionDenied))
    ));
    assert_eq!(view.state(), ViewState::Failed);
    assert!(view.current().is_none());
    assert!(view.error_message().is_some());
    // No request ever reached the server
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn position_timeout_surfaces_its_sub_reason() {
    let server = MockServer::start().await;

    let mut view = view_against(&server, Arc::new(StubLocator::failing(LocationError::Timeout)));
    let result = view.locate().await;

    assert!(matches!(
        result,
        Err(AppError::Location(LocationError::Timeout))
    ));
    assert_eq!(view.state(), ViewState::Failed);
}

#[tokio::test]
async fn new_search_supersedes_a_failed_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Madrid")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Madrid")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let mut view = view_against(&server, Arc::new(StubLocator::denied()));
    assert!(view.search("Atlantis").await.is_err());
    assert_eq!(view.state(), ViewState::Failed);

    view.search("Madrid").await.unwrap();
    assert_eq!(view.state(), ViewState::Success);
    assert!(view.error_message().is_none());
    assert_eq!(view.recent_searches(), ["Madrid"]);
}
