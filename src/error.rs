//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}' in resource {resource}")]
    MissingReference {
        resource: String,
        kind: &'static str,
        id: String,
    },
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("invalid page map for resource {resource}: {reason}")]
    InvalidPageMap { resource: String, reason: String },
    #[error("settings: {0}")]
    Settings(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Error raised by the SerpApi place lookup client: message, numeric code, diagnostic context and an optional cause.
#[derive(Error, Debug)]
#[error("serpapi error {code}: {message}")]
pub struct SerpApiError {
    pub message: String,
    pub code: i32,
    pub context: Map<String, Value>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SerpApiError {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        SerpApiError {
            message: message.into(),
            code,
            context: Map::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("the submitted form is invalid")]
    InvalidForm(FieldErrors),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthenticated: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Upstream(#[from] SerpApiError),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field form error.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.to_string(), vec![message.into()]);
        AppError::InvalidForm(errors)
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) | AppError::InvalidForm(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
            }
            AppError::Db(e) => match e {
                sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "not_found"),
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    (StatusCode::CONFLICT, "conflict")
                }
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            },
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::InvalidForm(errors) => serde_json::to_value(errors).ok(),
            AppError::Upstream(e) if !e.context.is_empty() => Some(Value::Object(e.context.clone())),
            _ => None,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serpapi_error_keeps_context_and_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
        let err = SerpApiError::new("place lookup failed", 504)
            .with_context("query", "Eiffel Tower")
            .with_context("attempt", 2)
            .with_source(io);

        assert_eq!(err.to_string(), "serpapi error 504: place lookup failed");
        assert_eq!(err.context().get("query"), Some(&json!("Eiffel Tower")));
        assert_eq!(err.context().get("attempt"), Some(&json!(2)));
        let cause = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("read timed out"));
    }

    #[test]
    fn upstream_error_maps_to_bad_gateway_with_context() {
        let err = AppError::from(SerpApiError::new("quota exceeded", 429).with_context("engine", "google_maps"));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "upstream_error"));
        assert_eq!(err.details(), Some(json!({ "engine": "google_maps" })));
    }

    #[test]
    fn form_errors_are_reported_as_details() {
        let err = AppError::field("title", "The title field is required.");
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details(), Some(json!({ "title": ["The title field is required."] })));
    }

    #[test]
    fn row_not_found_is_a_404() {
        let err = AppError::Db(sqlx::Error::RowNotFound);
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "not_found"));
    }
}
