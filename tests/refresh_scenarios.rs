//! End-to-end refresh cycles against a mock nginx.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use statuspanel::{
    Endpoints, HttpSource, LivenessState, PanelState, RawStatusKind, StatusPanel, ERROR_PREFIX,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STUB_STATUS: &str = "Active connections: 5 \n\
server accepts handled requests\n 16 16 31 \n\
Reading: 0 Writing: 1 Waiting: 4 \n";

fn panel_for(base_url: &str) -> StatusPanel<HttpSource> {
    let source = HttpSource::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    StatusPanel::new(source, Endpoints::default())
}

async fn mount(server: &MockServer, verb: &str, route: &str, response: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn healthy_host() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/status/raw", ResponseTemplate::new(200).set_body_string(STUB_STATUS))
        .await;
    mount(&server, "GET", "/api/v1/", ResponseTemplate::new(200)).await;
    mount(&server, "HEAD", "/admin", ResponseTemplate::new(200)).await;

    let panel = panel_for(&server.uri());
    let mut state = PanelState::new();
    let report = panel.run_with_rng(&mut state, &mut StdRng::seed_from_u64(1)).await;

    assert_eq!(state.raw_kind, RawStatusKind::Fetched);
    assert_eq!(state.raw_status, STUB_STATUS);
    assert!(state.updated.is_some());
    assert_eq!(state.api_status, LivenessState::Online);
    assert_eq!(state.db_status, LivenessState::Online);

    let connections = state.connections.unwrap();
    assert_eq!(connections.active, 5);
    assert_eq!(connections.requests, Some(31));

    let svg = state.sparkline.as_ref().unwrap().to_svg();
    assert_eq!(svg.matches(',').count(), 30);

    assert!(report.raw_ok());
    assert_eq!(report.active_connections, Some(5));
}

#[tokio::test]
async fn api_unavailable() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/status/raw", ResponseTemplate::new(200).set_body_string(STUB_STATUS))
        .await;
    mount(&server, "GET", "/api/v1/", ResponseTemplate::new(503)).await;
    mount(&server, "HEAD", "/admin", ResponseTemplate::new(200)).await;

    let mut state = PanelState::new();
    panel_for(&server.uri()).run(&mut state).await;

    assert_eq!(state.raw_kind, RawStatusKind::Fetched);
    assert_eq!(state.api_status, LivenessState::Offline);
    assert_eq!(state.db_status, LivenessState::Online);
}

#[tokio::test]
async fn admin_unreachable() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/status/raw", ResponseTemplate::new(200).set_body_string(STUB_STATUS))
        .await;
    mount(&server, "GET", "/api/v1/", ResponseTemplate::new(200)).await;
    // The admin probe times out instead of answering
    mount(
        &server,
        "HEAD",
        "/admin",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut state = PanelState::new();
    let source = HttpSource::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    StatusPanel::new(source, Endpoints::default()).run(&mut state).await;

    assert_eq!(state.api_status, LivenessState::Online);
    assert_eq!(state.db_status, LivenessState::Offline);
}

#[tokio::test]
async fn host_down() {
    // Bind and release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut state = PanelState::new();
    let report = panel_for(&format!("http://127.0.0.1:{port}")).run(&mut state).await;

    assert_eq!(state.raw_kind, RawStatusKind::Failed);
    assert!(state.raw_status.starts_with(ERROR_PREFIX));
    assert!(state.updated.is_none());
    // The liveness probes ran after the fetch failed and overwrote `unknown`
    assert_eq!(state.api_status, LivenessState::Offline);
    assert_eq!(state.db_status, LivenessState::Offline);
    assert!(state.sparkline.is_some());
    assert!(!report.raw_ok());
}

#[tokio::test]
async fn raw_status_error_response() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/status/raw", ResponseTemplate::new(502).set_body_string("bad gateway"))
        .await;
    mount(&server, "GET", "/api/v1/", ResponseTemplate::new(200)).await;
    mount(&server, "HEAD", "/admin", ResponseTemplate::new(200)).await;

    let mut state = PanelState::new();
    panel_for(&server.uri()).run(&mut state).await;

    assert_eq!(state.raw_kind, RawStatusKind::Failed);
    assert_eq!(state.raw_status, format!("{ERROR_PREFIX}HTTP 502"));
    assert_eq!(state.api_status, LivenessState::Online);
    assert_eq!(state.db_status, LivenessState::Online);
}

#[tokio::test]
async fn rerun_after_failure_keeps_updated_and_clears_counters() {
    let server = MockServer::start().await;
    mount(&server, "GET", "/status/raw", ResponseTemplate::new(200).set_body_string(STUB_STATUS))
        .await;
    mount(&server, "GET", "/api/v1/", ResponseTemplate::new(200)).await;
    mount(&server, "HEAD", "/admin", ResponseTemplate::new(200)).await;

    let mut state = PanelState::new();
    panel_for(&server.uri()).run(&mut state).await;
    let first_update = state.updated;
    assert!(first_update.is_some());

    // Every route now answers 404, so the updated slot is not written
    server.reset().await;
    panel_for(&server.uri()).run(&mut state).await;

    assert_eq!(state.raw_kind, RawStatusKind::Failed);
    assert_eq!(state.updated, first_update);
    // Counters from the first body are gone with it
    assert!(state.connections.is_none());
}
