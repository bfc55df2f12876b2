//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `knowledge.store_url`.
pub const STORE_URL_ENV: &str = "KNOWLEDGE_STORE_URL";
/// Environment variable overriding `knowledge.service_key`.
pub const SERVICE_KEY_ENV: &str = "KNOWLEDGE_SERVICE_KEY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides, and validate a TOML document.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let mut config: SiteConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build a configuration from defaults plus environment overrides, validated
/// the same way a file is.
pub fn config_from_env<F>(lookup: F) -> Result<SiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SiteConfig::default();
    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a value from the file.
pub fn apply_env_overrides<F>(config: &mut SiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(STORE_URL_ENV).filter(|v| !v.is_empty()) {
        config.knowledge.store_url = Some(url);
    }
    if let Some(key) = lookup(SERVICE_KEY_ENV).filter(|v| !v.is_empty()) {
        config.knowledge.service_key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let config = parse_config(
            r#"
            [site]
            name = "Clear View"
            base_url = "https://clearview.example"

            [rate_limit]
            booking_limit = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.site.name, "Clear View");
        assert_eq!(config.rate_limit.booking_limit, 2);
        // Untouched sections keep their defaults
        assert_eq!(config.security.api_prefix, "/api");
        assert_eq!(config.knowledge.result_limit, 3);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = parse_config("[rate_limit]\nbooking_window_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("rate_limit.booking_window_ms"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config.knowledge.service_key = Some("from-file".to_string());

        apply_env_overrides(&mut config, |name| match name {
            STORE_URL_ENV => Some("https://store.example".to_string()),
            SERVICE_KEY_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(
            config.knowledge.store_url.as_deref(),
            Some("https://store.example")
        );
        assert_eq!(config.knowledge.service_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_only_config_is_validated() {
        let err = config_from_env(|name| match name {
            STORE_URL_ENV => Some("not a url".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("knowledge.store_url"));

        let config = config_from_env(|name| match name {
            STORE_URL_ENV => Some("https://store.example".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config.knowledge.store_url.as_deref(),
            Some("https://store.example")
        );
    }
}
