//! Poller driven by scripted sensor output, observed through the store and
//! the HTTP scrape endpoint.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use udco2s_exporter::api::{create_router, AppState};
use udco2s_exporter::config::{PollerConfig, START_COMMAND};
use udco2s_exporter::serial::{FakeLineSource, FakeRead, ScriptedConnector};
use udco2s_exporter::{
    parse_line, LinkState, MetricsRegistry, PollEvent, Poller, SampleStore, SensorSample,
};

fn start(source: FakeLineSource) -> Poller<ScriptedConnector> {
    Poller::start(
        ScriptedConnector::new(vec![source]),
        Arc::new(SampleStore::new()),
        &PollerConfig::default(),
    )
    .expect("poller starts")
}

async fn scrape(store: Arc<SampleStore>) -> String {
    let metrics = Arc::new(MetricsRegistry::new(Arc::clone(&store)).unwrap());
    let app = create_router(AppState::new(metrics, store));
    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn last_of_n_valid_lines_wins() {
    let lines: Vec<String> = (0..25)
        .map(|i| format!("CO2={},HUM={}.5,TMP={}.25", 400 + i, 30 + i, 18 + i))
        .collect();
    let expected = parse_line(lines.last().unwrap()).unwrap();

    let mut poller = start(FakeLineSource::from_lines(lines.clone()));
    for _ in 0..lines.len() {
        assert!(matches!(poller.poll_once(), PollEvent::Committed(_)));
    }

    let sample = poller.store().sample();
    assert_eq!(sample.co2_ppm, expected.co2_ppm);
    assert_eq!(sample.humidity_pct, expected.humidity_pct);
    assert_eq!(sample.temperature_c, expected.temperature_c);
}

#[test]
fn malformed_lines_leave_sample_untouched() {
    let mut poller = start(FakeLineSource::from_lines([
        "CO2=512,HUM=45.3,TMP=21.7",
        "CO2=abc,HUM=45.3,TMP=21.7",
        "CO2=513,HUM=45.3",
        "CO2=514;HUM=45.3;TMP=21.7",
        "CO2=4294967296,HUM=45.3,TMP=21.7",
        "OK STA",
    ]));

    poller.poll_once();
    let committed = poller.store().sample();
    assert_eq!(committed.co2_ppm, 512);

    for _ in 0..5 {
        assert!(matches!(poller.poll_once(), PollEvent::Rejected(_)));
        assert_eq!(poller.store().sample(), committed);
    }
    assert_eq!(poller.store().snapshot().parse_errors, 5);
}

#[test]
fn first_success_moves_timestamp_forward() {
    let mut poller = start(FakeLineSource::from_lines(["CO2=600,HUM=44.0,TMP=23.0"]));
    let before = poller.store().sample().last_success_epoch;
    poller.poll_once();
    assert!(poller.store().sample().last_success_epoch > before);
}

#[test]
fn start_command_is_sent_once() {
    let source = FakeLineSource::new(vec![FakeRead::Timeout, FakeRead::Timeout]);
    let writes = source.writes();
    let mut poller = start(source);
    poller.poll_once();
    poller.poll_once();
    assert_eq!(writes.lock().as_slice(), &[START_COMMAND.to_string()]);
}

#[tokio::test]
async fn scrape_before_any_read_returns_zeros() {
    let poller = start(FakeLineSource::default());
    let body = scrape(Arc::clone(poller.store())).await;

    assert_eq!(poller.store().sample(), SensorSample::default());
    assert!(body.contains("udco2s_CO2 0"));
    assert!(body.contains("udco2s_HUM 0"));
    assert!(body.contains("udco2s_TEMP 0"));
    assert!(body.contains("udco2s_last 0"));
}

#[tokio::test]
async fn scrape_after_poll_shows_reading_and_link() {
    let mut poller = start(FakeLineSource::new(vec![
        FakeRead::line("CO2=512,HUM=45.3,TMP=21.7"),
        FakeRead::Timeout,
        FakeRead::Timeout,
        FakeRead::Timeout,
    ]));
    for _ in 0..4 {
        poller.poll_once();
    }
    assert_eq!(poller.store().link_state(), LinkState::Stale);

    let body = scrape(Arc::clone(poller.store())).await;
    assert!(body.contains("udco2s_CO2 512"));
    assert!(body.contains("udco2s_HUM 45.3"));
    assert!(body.contains("udco2s_TEMP 21.7"));
    assert!(body.contains("udco2s_link_state 1"));
}
