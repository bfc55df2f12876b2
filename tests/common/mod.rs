//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use brightpane::assistant::{ContentStore, KnowledgeItem, StoreError};
use brightpane::security::{ManualClock, SlidingWindowLimiter};
use brightpane::{HttpServer, SiteConfig};
use tower::ServiceExt;

/// In-memory store: an item matches when any query word longer than three
/// characters appears in its title or body. Fixture order stands in for the
/// store's ranking.
#[derive(Default)]
pub struct FixtureStore {
    items: Vec<KnowledgeItem>,
    pub queries: Mutex<Vec<String>>,
}

impl FixtureStore {
    pub fn new(items: Vec<KnowledgeItem>) -> Self {
        Self {
            items,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentStore for FixtureStore {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeItem>, StoreError> {
        self.queries.lock().unwrap().push(query.to_string());
        let words: Vec<String> = query
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 3)
            .collect();

        Ok(self
            .items
            .iter()
            .filter(|item| {
                let text = format!("{} {}", item.title, item.body).to_lowercase();
                words.iter().any(|w| text.contains(w.as_str()))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Store that always fails with an upstream status error.
pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<KnowledgeItem>, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }
}

/// Store that never answers within a test's patience.
pub struct StalledStore;

#[async_trait]
impl ContentStore for StalledStore {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<KnowledgeItem>, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

pub fn knowledge() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            "pricing",
            "house-prices",
            "House window cleaning prices",
            "Terraced houses from £15, semi-detached from £18.",
        ),
        KnowledgeItem::new(
            "faq",
            "payment",
            "How do I pay?",
            "We take card, bank transfer or cash after every clean.",
        ),
        KnowledgeItem::new(
            "pricing",
            "gutter-prices",
            "Gutter clearing prices",
            "Gutter clearing from £45 for a terraced house.",
        ),
        KnowledgeItem::new(
            "area",
            "service-areas",
            "Areas we cover",
            "We cover Bristol, Bath and Keynsham.",
        ),
        KnowledgeItem::new(
            "service",
            "conservatories",
            "Conservatory cleaning",
            "Full conservatory roof and frame cleaning.",
        ),
    ]
}

/// A server on a manual clock with inline sweeps disabled.
pub fn test_server(config: SiteConfig, store: Arc<dyn ContentStore>) -> (Arc<ManualClock>, HttpServer) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let limiter = Arc::new(SlidingWindowLimiter::with_clock(clock.clone(), 0.0));
    (clock, HttpServer::with_parts(config, store, limiter))
}

pub fn fixture_router() -> Router {
    let (_, server) = test_server(SiteConfig::default(), Arc::new(FixtureStore::new(knowledge())));
    server.router()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is not UTF-8")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send one request through the router in-process.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    TestResponse {
        status: parts.status,
        headers: parts.headers,
        body: body.to_vec(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Log lines written while a [`capture_logs`] guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's `warn!` and above into a buffer until the guard drops.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}
