//! End-to-end smoke tests for the full sunswitchd stack.
//!
//! Each test wires a real scheduler to the real HTTP device client, which
//! talks to a fake device controller bound on an ephemeral local port. The
//! control API is exercised via `tower::ServiceExt::oneshot`, so no port is
//! bound for it.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::routing::put;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use http_body_util::BodyExt;
use sunswitch_adapter_device_http::{DeviceHttpConfig, HttpDeviceClient};
use sunswitch_adapter_http_axum::router;
use sunswitch_adapter_http_axum::state::AppState;
use sunswitch_app::ports::Clock;
use sunswitch_app::scheduler::{Scheduler, SchedulerSettings};
use sunswitch_domain::error::SolarComputationError;
use sunswitch_domain::solar::{Coordinates, FixedSolarClock, SolarClock, SolarEvent, SolarSite};
use sunswitch_domain::switch_config::SwitchesSpec;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceExt;

type Received = Arc<Mutex<Vec<(String, i64)>>>;

/// 2024-02-01T12:00:00Z
const NOON: i64 = 1_706_788_800;

struct NoonClock;

impl Clock for NoonClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(NOON, 0).unwrap()
    }
}

struct PolarNight;

impl SolarClock for PolarNight {
    fn event_time(
        &self,
        event: SolarEvent,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<DateTime<Utc>, SolarComputationError> {
        Err(SolarComputationError::NoEvent {
            event,
            date,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }
}

const SWITCHES: &str = r#"
    [porch]
    mode = "auto"

    [[porch.timers]]
    on = { type = "sunset", offset = -1800 }
    off = { type = "daily", time = "23:00:00" }

    [hall]
    mode = "auto"
    on_value = 80

    [[hall.timers]]
    on = { type = "daily", time = "11:00:00" }
    off = { type = "daily", time = "13:00:00" }

    [heater]
    mode = "manual"
"#;

async fn record(
    State(received): State<Received>,
    Path(name): Path<String>,
    axum::Json(value): axum::Json<i64>,
) -> StatusCode {
    received.lock().await.push((name, value));
    StatusCode::OK
}

/// Serve a fake device controller and return a client pointed at it.
async fn fake_controller() -> (HttpDeviceClient, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/api/switch/{name}", put(record))
        .with_state(Arc::clone(&received));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should be available");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = HttpDeviceClient::new(&DeviceHttpConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_secs: 5,
    })
    .expect("client should build");
    (client, received)
}

fn site<S: SolarClock>(clock: S) -> SolarSite<S> {
    SolarSite::new(clock, Coordinates::default())
}

fn fixed_sun() -> FixedSolarClock {
    FixedSolarClock::new(
        NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
}

async fn stack() -> (
    AppState<FixedSolarClock, HttpDeviceClient, NoonClock>,
    Received,
) {
    let (client, received) = fake_controller().await;
    let scheduler = Scheduler::new(
        SchedulerSettings::default(),
        site(fixed_sun()),
        client,
        NoonClock,
    );
    let switches: SwitchesSpec = toml::from_str(SWITCHES).unwrap();
    scheduler.load(&switches).await.unwrap();
    (AppState::new(scheduler), received)
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn sorted(received: &Received) -> Vec<(String, i64)> {
    let mut calls = received.lock().await.clone();
    calls.sort();
    calls
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (state, _) = stack().await;
    let resp = router::build(state)
        .oneshot(request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_push_tick_results_to_the_controller() {
    let (state, received) = stack().await;

    state.scheduler.tick(NOON).await;

    // porch: 16:30..23:00 is inactive at noon, hall: 11..13 is active,
    // heater is manual.
    assert_eq!(
        sorted(&received).await,
        vec![("hall".to_string(), 80), ("porch".to_string(), 0)]
    );
}

#[tokio::test]
async fn should_skip_ticks_off_the_resolution_grid() {
    let (state, received) = stack().await;

    state.scheduler.step(NOON + 1).await;
    assert!(received.lock().await.is_empty());
    assert_eq!(state.scheduler.current_second().await, NOON + 1);

    state.scheduler.step(NOON + 599).await;
    assert!(received.lock().await.is_empty());

    state.scheduler.step(NOON + 600).await;
    assert_eq!(received.lock().await.len(), 2);
}

// ---------------------------------------------------------------------------
// Control API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_dump_loaded_switches() {
    let (state, _) = stack().await;
    let resp = router::build(state)
        .oneshot(request("GET", "/api/switches", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["hall"]["on_value"], 80);
    assert_eq!(body["heater"]["on_value"], 255);
    assert_eq!(body["heater"]["mode"], "manual");
    assert_eq!(
        body["porch"]["timers"][0]["on"],
        serde_json::json!({"type": "sunset", "offset": -1800})
    );
    assert_eq!(
        body["porch"]["timers"][0]["off"],
        serde_json::json!({"type": "daily", "time": "23:00:00"})
    );
}

#[tokio::test]
async fn should_dispatch_when_mode_is_set() {
    let (state, received) = stack().await;
    let resp = router::build(state)
        .oneshot(request(
            "PUT",
            "/api/switches/heater/mode",
            Some(r#"{"mode":"on"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(sorted(&received).await, vec![("heater".to_string(), 255)]);
}

#[tokio::test]
async fn should_not_dispatch_when_mode_set_to_manual() {
    let (state, received) = stack().await;
    let resp = router::build(state)
        .oneshot(request(
            "PUT",
            "/api/switches/porch/mode",
            Some(r#"{"mode":"manual"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(received.lock().await.is_empty());
}

#[tokio::test]
async fn should_add_and_remove_timers() {
    let (state, _) = stack().await;
    let app = router::build(state.clone());

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/switches/heater/timers",
            Some(
                r#"{"on":{"type":"daily","time":"06:00:00"},"off":{"type":"sunrise","offset":0}}"#,
            ),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["id"].as_u64().unwrap();
    // Two timers were allocated by the initial load.
    assert_eq!(id, 3);
    assert_eq!(state.scheduler.switch("heater").await.unwrap().timers.len(), 1);

    let resp = app
        .clone()
        .oneshot(request("DELETE", &format!("/api/timers/{id}"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.scheduler.switch("heater").await.unwrap().timers.is_empty());

    let resp = app
        .oneshot(request("DELETE", &format!("/api/timers/{id}"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_malformed_timer() {
    let (state, _) = stack().await;
    let resp = router::build(state)
        .oneshot(request(
            "POST",
            "/api/switches/heater/timers",
            Some(r#"{"on":{"type":"moonrise","offset":0},"off":{"type":"sunset","offset":0}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("moonrise"));
}

#[tokio::test]
async fn should_reject_timer_for_unknown_switch() {
    let (state, _) = stack().await;
    let resp = router::build(state)
        .oneshot(request(
            "POST",
            "/api/switches/attic/timers",
            Some(r#"{"on":{"type":"sunset","offset":0},"off":{"type":"daily","time":"23:00:00"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_duplicate_switch() {
    let (state, _) = stack().await;
    let resp = router::build(state)
        .oneshot(request(
            "POST",
            "/api/switches",
            Some(r#"{"name":"porch","mode":"off"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_report_unresolvable_sun_as_unprocessable() {
    let (client, received) = fake_controller().await;
    let scheduler = Scheduler::new(
        SchedulerSettings::default(),
        site(PolarNight),
        client,
        NoonClock,
    );
    let switches: SwitchesSpec = toml::from_str(SWITCHES).unwrap();
    scheduler.load(&switches).await.unwrap();
    let state = AppState::new(scheduler);

    let resp = router::build(state.clone())
        .oneshot(request(
            "PUT",
            "/api/switches/porch/mode",
            Some(r#"{"mode":"auto"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(received.lock().await.is_empty());

    // Daily-only switches keep working under the same sky.
    state.scheduler.tick(NOON).await;
    assert_eq!(sorted(&received).await, vec![("hall".to_string(), 80)]);
}
