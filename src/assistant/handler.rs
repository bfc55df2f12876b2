//! HTTP surface of the assistant.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::assistant::answer::synthesize;
use crate::assistant::store::{ContentStore, StoreError};
use crate::observability::metrics;

const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "authorization, x-client-info, apikey, content-type",
    ),
];

/// State for the assistant handlers.
#[derive(Clone)]
pub struct AssistantState {
    pub store: Arc<dyn ContentStore>,
    pub result_limit: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssistantParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// The two failures a caller can see.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Missing query parameter 'q'")]
    BadRequest,
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        let status = match self {
            AssistantError::BadRequest | AssistantError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AssistantError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        with_cors(
            (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response(),
        )
    }
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// `OPTIONS`: always succeeds, empty body.
pub async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// `GET ?q=`: search the store and synthesize an answer.
pub async fn ask(
    State(state): State<AssistantState>,
    params: Result<Query<AssistantParams>, QueryRejection>,
) -> Result<Response, AssistantError> {
    let Query(params) =
        params.map_err(|rejection| AssistantError::InvalidQuery(rejection.body_text()))?;
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or(AssistantError::BadRequest)?;

    let matches = state
        .store
        .search(&query, state.result_limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, query = %query, "Knowledge search failed");
            e
        })?;

    let (rule, body) = synthesize(&query, &matches);
    metrics::record_assistant_answer(rule);
    tracing::info!(query = %query, matches = matches.len(), rule, "Assistant answered");

    Ok(with_cors(Json(body).into_response()))
}
