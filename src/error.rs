//! Error types for the blog service
//!
//! Every failure is turned into an HTTP response at the request boundary.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::auth::login_redirect_url;

// == Form Errors ==
/// Field-level validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single message on a single field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BlogError::Validation(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

// == Blog Error Enum ==
/// Unified error type for the blog service.
#[derive(Error, Debug)]
pub enum BlogError {
    /// Unknown slug, username, post id or media name
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anonymous caller on a protected route; carries the path to come back to
    #[error("Authentication required for {next}")]
    Unauthenticated { next: String },

    /// Malformed form input
    #[error("Invalid form: {0}")]
    Validation(FormErrors),

    /// Unique constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        BlogError::Internal(format!("failed to render page: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            BlogError::Unauthenticated { next } => {
                return Redirect::to(&login_redirect_url(next)).into_response();
            }
            BlogError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            BlogError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid form", "fields": fields }),
            ),
            BlogError::Conflict(_) => (StatusCode::CONFLICT, json!({ "error": self.to_string() })),
            BlogError::Internal(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the blog service.
pub type Result<T> = std::result::Result<T, BlogError>;
