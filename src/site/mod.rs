//! Site content endpoints.
//!
//! Everything here is derived from the immutable `SiteConfig`, except
//! booking submission, which also consults the shared rate limiter.

pub mod booking;
pub mod seo;

use axum::{extract::State, Json};

use crate::config::SiteIdentity;
use crate::http::server::AppState;

/// `GET /api/site`
pub async fn identity(State(state): State<AppState>) -> Json<SiteIdentity> {
    Json(state.config.site.clone())
}
