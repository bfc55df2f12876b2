//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs. All
//! problems are collected so a bad file is reported in one pass.

use crate::config::schema::SiteConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    match url::Url::parse(&config.site.base_url) {
        Ok(_) if config.site.base_url.ends_with('/') => {
            errors.push(ValidationError::new(
                "site.base_url",
                "must not end with '/'",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("site.base_url", e.to_string())),
    }

    if config.site.postcode_prefixes.is_empty() {
        errors.push(ValidationError::new(
            "site.postcode_prefixes",
            "at least one covered prefix is required",
        ));
    }

    for page in &config.seo.pages {
        if !page.path.starts_with('/') {
            errors.push(ValidationError::new(
                "seo.pages",
                format!("path must start with '/': {}", page.path),
            ));
        }
        if !(0.0..=1.0).contains(&page.priority) {
            errors.push(ValidationError::new(
                "seo.pages",
                format!("priority out of range for {}: {}", page.path, page.priority),
            ));
        }
    }

    if !config.security.api_prefix.starts_with('/')
        || config.security.api_prefix.trim_end_matches('/').is_empty()
    {
        errors.push(ValidationError::new(
            "security.api_prefix",
            "must start with '/' and name a path segment",
        ));
    }

    if config.rate_limit.booking_limit == 0 {
        errors.push(ValidationError::new("rate_limit.booking_limit", "must be > 0"));
    }
    if config.rate_limit.booking_window_ms == 0 {
        errors.push(ValidationError::new("rate_limit.booking_window_ms", "must be > 0"));
    }
    if !(0.0..=1.0).contains(&config.rate_limit.sweep_probability) {
        errors.push(ValidationError::new(
            "rate_limit.sweep_probability",
            "must be between 0.0 and 1.0",
        ));
    }

    if let Some(store_url) = &config.knowledge.store_url {
        if let Err(e) = url::Url::parse(store_url) {
            errors.push(ValidationError::new("knowledge.store_url", e.to_string()));
        }
    }
    if config.knowledge.result_limit == 0 {
        errors.push(ValidationError::new("knowledge.result_limit", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
