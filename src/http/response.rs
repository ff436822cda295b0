//! API error responses.
//!
//! # Responsibilities
//! - Map store outcomes to HTTP status codes
//! - Render every error as `{"error": <message>}`
//! - Log internal faults without leaking their detail to the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::{ContactId, StoreError};

/// Store operation a handler was performing, used for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Get(ContactId),
    Create,
    Update(ContactId),
    Delete(ContactId),
}

impl StoreOp {
    /// Client-facing message for an internal failure of this operation.
    fn failure_message(self) -> String {
        match self {
            Self::List => "Failed to fetch contacts".to_string(),
            Self::Get(id) => format!("Failed to fetch contact {id}"),
            Self::Create => "Failed to create contact".to_string(),
            Self::Update(id) => format!("Failed to update contact {id}"),
            Self::Delete(id) => format!("Failed to delete contact {id}"),
        }
    }
}

/// Errors a request can end in.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    InvalidBody,
    InvalidQuery,
    PayloadTooLarge,
    Timeout,
    NotFound(ContactId),
    RouteNotFound,
    MethodNotAllowed,
    Internal(String),
}

impl ApiError {
    /// Generic 500 used when no operation context is available.
    pub fn internal() -> Self {
        Self::Internal("Internal server error".to_string())
    }

    /// Translate a store failure, logging internal faults.
    pub fn from_store(err: StoreError, op: StoreOp) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Validation(e) => Self::Validation(e.to_string()),
            err => {
                tracing::error!(operation = ?op, error = %err, "Store operation failed");
                Self::Internal(op.failure_message())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody | Self::InvalidQuery => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::NotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Internal(msg) => msg.clone(),
            Self::InvalidBody => "Invalid JSON body".to_string(),
            Self::InvalidQuery => "Invalid query string".to_string(),
            Self::PayloadTooLarge => "Request body too large".to_string(),
            Self::Timeout => "Request timed out".to_string(),
            Self::NotFound(id) => format!("Contact {id} not found"),
            Self::RouteNotFound => "Resource not found".to_string(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
