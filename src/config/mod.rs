//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Knowledge store credentials may come from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{config_from_env, load_config, ConfigError};
pub use schema::{
    KnowledgeConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, SecurityConfig,
    SeoConfig, SiteConfig, SiteIdentity, SitemapPage, TimeoutConfig,
};
