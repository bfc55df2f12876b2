//! Backend for a local window-cleaning business site.
//!
//! Serves SEO text endpoints, the booking form catalogue and submissions,
//! and a knowledge-base assistant, behind a security gate and a per-client
//! sliding-log rate limiter.

pub mod assistant;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod site;

pub use config::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
