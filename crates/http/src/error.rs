//! Error handling for the STACKS HTTP layer.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use stacks_store::StoreError;

use crate::views;

/// Application error types that map to HTTP error pages.
///
/// Validation failures are not represented here: an invalid form re-renders
/// with HTTP 200 and never leaves the handler as an error.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound {
                message: err.to_string(),
            },
            StoreError::Backend(_) => Self::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::now_v7();
        let timestamp = OffsetDateTime::now_utc().to_string();

        let (status, title, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, "Not Found", message),
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "Bad Request", message),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server Error",
                e.to_string(),
            ),
        };

        tracing::error!(
            trace_id = %trace_id,
            status_code = %status.as_u16(),
            %message,
            "request error"
        );

        // In production, hide internal error details
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = format!(
            "<p>{}</p>\n<p class=\"trace\"><small>trace {} at {}</small></p>",
            views::escape_html(&message),
            trace_id,
            views::escape_html(&timestamp),
        );

        (status, Html(views::page_shell(title, &body))).into_response()
    }
}
