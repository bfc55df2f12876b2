//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (security gate, tracing, timeouts, request ID, metrics)
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRef},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assistant::{self, AssistantState, ContentStore, PostgrestStore};
use crate::config::SiteConfig;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::observability::metrics;
use crate::security::{security_gate, GateState, SlidingWindowLimiter};
use crate::site::{self, booking, seo};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub store: Arc<dyn ContentStore>,
}

impl FromRef<AppState> for AssistantState {
    fn from_ref(state: &AppState) -> Self {
        AssistantState {
            store: state.store.clone(),
            result_limit: state.config.knowledge.result_limit,
        }
    }
}

/// HTTP server for the site backend.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the configured PostgREST knowledge store.
    pub fn new(config: SiteConfig) -> Self {
        let store = Arc::new(PostgrestStore::from_config(&config.knowledge));
        let limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit.sweep_probability));
        Self::with_parts(config, store, limiter)
    }

    /// Create a server from explicit parts. Tests inject a fixture store and
    /// a limiter on a manual clock here.
    pub fn with_parts(
        config: SiteConfig,
        store: Arc<dyn ContentStore>,
        limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        let state = AppState {
            config: Arc::new(config),
            limiter,
            store,
        };
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();
        let gate = GateState::from_config(&config.security);

        let api = Router::new()
            .route("/site", get(site::identity))
            .route("/booking/options", get(booking::options))
            .route("/booking", post(booking::submit))
            .route(
                "/assistant",
                get(assistant::handler::ask).options(assistant::handler::preflight),
            );

        Router::new()
            .route("/health", get(health))
            .route("/robots.txt", get(seo::robots))
            .route("/sitemap.xml", get(seo::sitemap))
            .nest(config.security.api_prefix.trim_end_matches('/'), api)
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            // Outside the timeout so a 408 on an API path is still tagged
            .layer(middleware::from_fn_with_state(gate, security_gate))
            .layer(middleware::from_fn(track_requests))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
