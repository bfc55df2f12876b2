//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site
//! backend. All types derive Serde traits for deserialization from TOML and
//! every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the site backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Business identity shown on the site and used by SEO endpoints.
    pub site: SiteIdentity,

    /// Sitemap page list.
    pub seo: SeoConfig,

    /// Security gate settings.
    pub security: SecurityConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Knowledge store connection for the assistant endpoint.
    pub knowledge: KnowledgeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one request/response in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 15 }
    }
}

/// Business identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteIdentity {
    pub name: String,

    /// Canonical origin, no trailing slash (e.g., "https://example.co.uk").
    pub base_url: String,

    pub phone: String,
    pub email: String,
    pub address: String,

    /// Services offered, in display order.
    pub services: Vec<String>,

    /// Named towns/areas covered. Each gets a sitemap entry.
    pub service_areas: Vec<String>,

    /// Postcode outward prefixes accepted by the booking form (e.g., "BS").
    pub postcode_prefixes: Vec<String>,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: "Brightpane Window Cleaning".to_string(),
            base_url: "http://localhost:8080".to_string(),
            phone: "0117 000 0000".to_string(),
            email: "hello@brightpane.local".to_string(),
            address: "1 High Street, Bristol".to_string(),
            services: vec![
                "Window cleaning".to_string(),
                "Gutter clearing".to_string(),
                "Conservatory cleaning".to_string(),
                "Fascia and soffit cleaning".to_string(),
            ],
            service_areas: vec![
                "Bristol".to_string(),
                "Bath".to_string(),
                "Keynsham".to_string(),
            ],
            postcode_prefixes: vec!["BS".to_string(), "BA".to_string()],
        }
    }
}

/// One page listed in the sitemap.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SitemapPage {
    /// Path relative to the base URL, starting with '/'.
    pub path: String,

    /// Sitemap change frequency ("daily", "weekly", "monthly", ...).
    #[serde(default = "default_change_freq")]
    pub change_freq: String,

    /// Relative priority between 0.0 and 1.0.
    #[serde(default = "default_priority")]
    pub priority: f32,
}

impl SitemapPage {
    pub fn new(path: &str, change_freq: &str, priority: f32) -> Self {
        Self {
            path: path.to_string(),
            change_freq: change_freq.to_string(),
            priority,
        }
    }
}

fn default_change_freq() -> String {
    "monthly".to_string()
}

fn default_priority() -> f32 {
    0.5
}

/// SEO configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SeoConfig {
    pub pages: Vec<SitemapPage>,

    /// Emitted as `<lastmod>` on every sitemap entry when set (YYYY-MM-DD).
    pub last_modified: Option<String>,

    /// Change frequency used for generated service-area pages.
    pub area_change_freq: String,

    /// Priority used for generated service-area pages.
    pub area_priority: f32,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            pages: vec![
                SitemapPage::new("/", "weekly", 1.0),
                SitemapPage::new("/services", "monthly", 0.9),
                SitemapPage::new("/pricing", "monthly", 0.9),
                SitemapPage::new("/areas", "monthly", 0.8),
                SitemapPage::new("/faq", "monthly", 0.7),
                SitemapPage::new("/book", "monthly", 0.8),
                SitemapPage::new("/contact", "yearly", 0.6),
            ],
            last_modified: None,
            area_change_freq: "monthly".to_string(),
            area_priority: 0.7,
        }
    }
}

/// Security gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Paths under this prefix get API response headers.
    pub api_prefix: String,

    /// Value of the `x-api-version` response header.
    pub api_version: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            api_version: "1.0".to_string(),
            max_body_size: 64 * 1024,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Booking submissions allowed per client per window.
    pub booking_limit: usize,

    /// Booking window length in milliseconds.
    pub booking_window_ms: u64,

    /// Chance per check of sweeping every idle client (0.0..=1.0).
    pub sweep_probability: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            booking_limit: 5,
            booking_window_ms: 15 * 60 * 1000,
            sweep_probability: 0.01,
        }
    }
}

/// Knowledge store connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Store origin (e.g., "https://project.supabase.co").
    /// Overridden by `KNOWLEDGE_STORE_URL`.
    pub store_url: Option<String>,

    /// Service credential. Overridden by `KNOWLEDGE_SERVICE_KEY`.
    pub service_key: Option<String>,

    /// Table holding knowledge items.
    pub table: String,

    /// Full-text indexed column.
    pub search_column: String,

    /// Maximum matches used per answer.
    pub result_limit: usize,

    /// Store request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            store_url: None,
            service_key: None,
            table: "knowledge_items".to_string(),
            search_column: "search_vector".to_string(),
            result_limit: 3,
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
