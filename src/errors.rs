//! Error handling for the CRUD surface.
//!
//! Client-visible responses are sanitized JSON bodies; database details are
//! logged through `tracing`; unexpected persistence failures are re-wrapped
//! into a 400 response with the message attached.
//!
//! Taxonomy:
//! - [`CrudError::NotFound`]: a single-record lookup matched zero rows
//!   (including tombstoned rows under the soft-delete read mode).
//! - [`CrudError::BadRequest`]: filter/configuration errors and unexpected
//!   persistence errors, message attached.
//! - [`CrudError::Validation`]: payload validation failures, enumerating each
//!   invalid field with its violated constraints.
//! - [`CrudError::Internal`]: reserved; archival bookkeeping failures during
//!   delete are logged and swallowed rather than surfaced.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filter::FilterError;
use crate::validation::ConstraintViolation;

#[derive(Debug)]
pub enum CrudError {
    /// 404: zero rows matched a single-record lookup.
    NotFound {
        resource: String,
        id: Option<String>,
    },
    /// 400: invalid request, or a persistence error re-wrapped with its
    /// message.
    BadRequest { message: String },
    /// 400: payload validation failed; one entry per invalid field.
    Validation {
        violations: Vec<ConstraintViolation>,
    },
    /// 500: an internal failure with details kept out of the response.
    Internal {
        message: String,
        internal: Option<String>,
    },
}

impl CrudError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound { resource: resource.into(), id }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    #[must_use]
    pub fn validation(violations: Vec<ConstraintViolation>) -> Self {
        Self::Validation { violations }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal { message: message.into(), internal }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::BadRequest { message } => message.clone(),
            Self::Validation { .. } => "Validation failed".to_string(),
            Self::Internal { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Internal { internal: Some(details), message } => {
                tracing::error!(details = %details, "{message}");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "request failed"
                );
            }
        }
    }
}

/// Sanitized response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ConstraintViolation>>,
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let response = match &self {
            Self::Validation { violations } => ErrorResponse {
                error: self.user_message(),
                details: Some(violations.clone()),
            },
            _ => ErrorResponse { error: self.user_message(), details: None },
        };
        (status, Json(response)).into_response()
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for CrudError {}

/// `RecordNotFound` keeps its 404 identity; every other database error is
/// logged and re-wrapped as a 400 with the message attached.
impl From<DbErr> for CrudError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound { resource: resource.to_string(), id: None }
            }
            _ => {
                tracing::error!(error = ?err, "database error");
                Self::BadRequest { message: err.to_string() }
            }
        }
    }
}

impl From<FilterError> for CrudError {
    fn from(err: FilterError) -> Self {
        Self::BadRequest { message: err.to_string() }
    }
}
