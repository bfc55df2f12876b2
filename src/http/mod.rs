//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace, timeout, body limit, metrics)
//!     → security gate
//!     → route: /health, /robots.txt, /sitemap.xml, /api/...
//!     → handler response (API paths tagged by the gate)
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
