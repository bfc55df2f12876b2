//! Knowledge content store.
//!
//! The store owns the knowledge items and ranks them; this side only asks
//! for the top matches of a query and takes them in the order returned.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::KnowledgeConfig;

/// One indexed content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Category tag such as `pricing`, `faq` or `area`.
    pub kind: String,
    pub slug: String,
    pub title: String,
    pub body: String,
}

impl KnowledgeItem {
    pub fn new(kind: &str, slug: &str, title: &str, body: &str) -> Self {
        Self {
            kind: kind.to_string(),
            slug: slug.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Error type for content store queries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("knowledge store is not configured: missing {0}")]
    NotConfigured(&'static str),
    #[error("knowledge store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("knowledge store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("knowledge store response could not be decoded: {0}")]
    Decode(String),
}

/// A relevance-ranked text search over knowledge items.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Return at most `limit` items matching `query`, best first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeItem>, StoreError>;
}

/// PostgREST-backed store (e.g. a Supabase project).
///
/// Issues `GET {url}/rest/v1/{table}?{column}=wfts.{query}` with the
/// service key as both `apikey` and bearer token.
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: Option<String>,
    service_key: Option<String>,
    table: String,
    search_column: String,
}

impl PostgrestStore {
    pub fn from_config(config: &KnowledgeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client for knowledge store");
                reqwest::Client::new()
            });

        if config.store_url.is_none() || config.service_key.is_none() {
            tracing::warn!("Knowledge store credentials missing; assistant queries will fail");
        }

        Self {
            client,
            base_url: config
                .store_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            service_key: config.service_key.clone(),
            table: config.table.clone(),
            search_column: config.search_column.clone(),
        }
    }

    fn endpoint(&self) -> Result<String, StoreError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(StoreError::NotConfigured("store URL"))?;
        Ok(format!("{}/rest/v1/{}", base, self.table))
    }
}

#[async_trait]
impl ContentStore for PostgrestStore {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeItem>, StoreError> {
        let endpoint = self.endpoint()?;
        let key = self
            .service_key
            .as_deref()
            .ok_or(StoreError::NotConfigured("service key"))?;

        let response = self
            .client
            .get(&endpoint)
            .header("apikey", key)
            .bearer_auth(key)
            .query(&[
                ("select", "kind,slug,title,body".to_string()),
                (self.search_column.as_str(), format!("wfts.{}", query)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let mut items: Vec<KnowledgeItem> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))?;
        items.truncate(limit);

        tracing::debug!(query = %query, matches = items.len(), "Knowledge store search");
        Ok(items)
    }
}
