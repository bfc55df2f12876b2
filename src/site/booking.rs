//! Booking form constants and submission.
//!
//! The option lists are fixed; the form and the server validate against the
//! same ids. Submissions are throttled per client with the shared limiter.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::client_ip;

/// One selectable value on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingOption {
    pub id: &'static str,
    pub label: &'static str,
}

const fn opt(id: &'static str, label: &'static str) -> BookingOption {
    BookingOption { id, label }
}

pub const SERVICES: &[BookingOption] = &[
    opt("windows", "Window cleaning"),
    opt("gutters", "Gutter clearing"),
    opt("conservatory", "Conservatory cleaning"),
    opt("fascias", "Fascia and soffit cleaning"),
    opt("solar", "Solar panel cleaning"),
];

pub const FREQUENCIES: &[BookingOption] = &[
    opt("one-off", "One-off clean"),
    opt("4-weekly", "Every 4 weeks"),
    opt("8-weekly", "Every 8 weeks"),
    opt("12-weekly", "Every 12 weeks"),
];

pub const PROPERTY_TYPES: &[BookingOption] = &[
    opt("flat", "Flat or apartment"),
    opt("terraced", "Terraced house"),
    opt("semi-detached", "Semi-detached house"),
    opt("detached", "Detached house"),
    opt("commercial", "Commercial premises"),
];

pub const CONTACT_TIMES: &[BookingOption] = &[
    opt("morning", "Morning (8am - 12pm)"),
    opt("afternoon", "Afternoon (12pm - 5pm)"),
    opt("evening", "Evening (5pm - 8pm)"),
    opt("any", "Any time"),
];

/// All option lists, as served to the form.
#[derive(Debug, Clone, Serialize)]
pub struct BookingCatalogue {
    pub services: &'static [BookingOption],
    pub frequencies: &'static [BookingOption],
    pub property_types: &'static [BookingOption],
    pub contact_times: &'static [BookingOption],
}

pub const CATALOGUE: BookingCatalogue = BookingCatalogue {
    services: SERVICES,
    frequencies: FREQUENCIES,
    property_types: PROPERTY_TYPES,
    contact_times: CONTACT_TIMES,
};

fn is_known(options: &[BookingOption], id: &str) -> bool {
    options.iter().any(|o| o.id == id)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub postcode: String,
    pub address: String,
    pub service: String,
    pub frequency: String,
    pub property_type: String,
    #[serde(default)]
    pub contact_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub reference: Uuid,
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Too many booking requests, please try again later")]
    RateLimited { retry_after_secs: u64 },
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
    #[error("Malformed booking request: {message}")]
    Malformed { status: StatusCode, message: String },
}

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        match self {
            BookingError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            BookingError::Invalid { .. } => (StatusCode::UNPROCESSABLE_ENTITY, body).into_response(),
            BookingError::Malformed { status, .. } => (status, body).into_response(),
        }
    }
}

/// Outward-code letters of a UK postcode ("bs8 1th" → "BS").
pub fn postcode_prefix(postcode: &str) -> String {
    postcode
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

impl BookingRequest {
    /// Check required fields, option ids and postcode coverage.
    pub fn validate(&self, covered_prefixes: &[String]) -> Result<(), BookingError> {
        let invalid = |field, reason| Err(BookingError::Invalid { field, reason });

        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("postcode", &self.postcode),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return invalid(field, "is required");
            }
        }

        if !looks_like_email(self.email.trim()) {
            return invalid("email", "is not an email address");
        }
        if !is_known(SERVICES, &self.service) {
            return invalid("service", "is not a service we offer");
        }
        if !is_known(FREQUENCIES, &self.frequency) {
            return invalid("frequency", "is not a known frequency");
        }
        if !is_known(PROPERTY_TYPES, &self.property_type) {
            return invalid("property_type", "is not a known property type");
        }
        if let Some(time) = &self.contact_time {
            if !is_known(CONTACT_TIMES, time) {
                return invalid("contact_time", "is not a known contact time");
            }
        }

        let prefix = postcode_prefix(&self.postcode);
        if !covered_prefixes.iter().any(|p| p.eq_ignore_ascii_case(&prefix)) {
            return invalid("postcode", "is outside our service area");
        }

        Ok(())
    }
}

pub async fn options() -> Json<BookingCatalogue> {
    Json(CATALOGUE)
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingReceipt>), BookingError> {
    let limits = &state.config.rate_limit;
    let window = Duration::from_millis(limits.booking_window_ms);
    let client = client_ip::resolve(&headers);

    if !state.limiter.admit(&client, limits.booking_limit, window) {
        tracing::warn!(client = %client, "Booking rate limit exceeded");
        metrics::record_rate_limited("booking");
        return Err(BookingError::RateLimited {
            retry_after_secs: window.as_secs().max(1),
        });
    }

    // Malformed bodies are rejected only after the limiter has counted them
    let Json(request) = request?;
    request.validate(&state.config.site.postcode_prefixes)?;

    let receipt = BookingReceipt {
        reference: Uuid::new_v4(),
        status: "received".to_string(),
    };
    metrics::record_booking();
    tracing::info!(
        reference = %receipt.reference,
        service = %request.service,
        frequency = %request.frequency,
        postcode_prefix = %postcode_prefix(&request.postcode),
        "Booking request received"
    );

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
