//! Handler tests against stubbed locator and renderer seams.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use radar_api::handlers::NO_RADAR_MESSAGE;
use radar_api::router;
use radar_api::state::{AppState, ScanLocator, ScanRenderer};
use radar_common::{RadarError, RadarResult};
use storage::Locate;

enum LocateBehavior {
    Found(&'static str),
    NotFound,
    Fail,
}

struct StubLocator(LocateBehavior);

#[async_trait]
impl ScanLocator for StubLocator {
    async fn latest_scan(&self) -> RadarResult<Locate> {
        match &self.0 {
            LocateBehavior::Found(key) => Ok(Locate::Found(key.to_string())),
            LocateBehavior::NotFound => Ok(Locate::NotFound),
            LocateBehavior::Fail => Err(RadarError::Storage("listing timed out".into())),
        }
    }
}

struct StubRenderer {
    calls: AtomicUsize,
    last_key: Mutex<Option<String>>,
    fail: bool,
}

impl StubRenderer {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_key: Mutex::new(None),
            fail,
        })
    }
}

#[async_trait]
impl ScanRenderer for StubRenderer {
    async fn render(&self, key: &str) -> RadarResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_key.lock().unwrap() = Some(key.to_string());
        if self.fail {
            return Err(RadarError::Render("bad archive".into()));
        }
        renderer::png::encode(&[0u8, 0, 0, 255, 255, 255, 255, 255], 2, 1)
    }
}

fn app(locator: LocateBehavior, renderer: Arc<StubRenderer>) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(StubLocator(locator)), renderer));
    router(state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn not_found_returns_message_without_rendering() {
    let renderer = StubRenderer::new(false);
    let (status, content_type, body) =
        get(app(LocateBehavior::NotFound, renderer.clone()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, NO_RADAR_MESSAGE.as_bytes());
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn locate_error_collapses_to_not_found() {
    let renderer = StubRenderer::new(false);
    let (status, _, body) = get(app(LocateBehavior::Fail, renderer.clone()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, NO_RADAR_MESSAGE.as_bytes());
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn success_returns_png_for_located_key() {
    let key = "2017/05/28/KNQA/KNQA20170528_155323_V06";
    let renderer = StubRenderer::new(false);
    let (status, content_type, body) =
        get(app(LocateBehavior::Found(key), renderer.clone()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(&body[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        renderer.last_key.lock().unwrap().as_deref(),
        Some(key)
    );
}

#[tokio::test]
async fn render_failure_returns_server_error() {
    let key = "2017/05/28/KNQA/KNQA20170528_155323_V06";
    let renderer = StubRenderer::new(true);
    let (status, _, body) = get(app(LocateBehavior::Found(key), renderer.clone()), "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn health_endpoint_is_alive() {
    let renderer = StubRenderer::new(false);
    let (status, _, body) = get(app(LocateBehavior::NotFound, renderer), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
