//! Best-effort client address from proxy headers.
//!
//! Headers are checked in a fixed order and the first one present wins.
//! Values are not validated; a garbage header yields a garbage key, which is
//! still a usable rate-limit key.

use axum::http::HeaderMap;

/// Returned when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "0.0.0.0";

/// How a header value is turned into an address.
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// First entry of a comma-separated list, trimmed.
    FirstListEntry,
    /// The whole value.
    Whole,
}

/// Checked in order.
const RULES: &[(&str, Extract)] = &[
    ("x-forwarded-for", Extract::FirstListEntry),
    ("x-real-ip", Extract::Whole),
    ("x-vercel-forwarded-for", Extract::FirstListEntry),
];

/// Resolve the client identifier for a request.
pub fn resolve(headers: &HeaderMap) -> String {
    RULES
        .iter()
        .find_map(|(name, extract)| {
            let value = headers.get(*name)?.to_str().ok()?;
            Some(match extract {
                Extract::FirstListEntry => value.split(',').next().unwrap_or(value).trim(),
                Extract::Whole => value,
            })
        })
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
