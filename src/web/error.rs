//! Error responses for the blog's web pages.
//!
//! A [`WebError`] turns into a bare response that carries an [`ErrorPage`]
//! extension; the `error_pages` middleware renders it with the site's
//! templates.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::template::escape_html;
use crate::BlogError;

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error page details attached to an error response.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: String,
}

/// Web error type.
#[derive(Debug)]
pub struct WebError {
    code: ErrorCode,
    message: String,
}

impl WebError {
    /// Create a new web error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The message shown to the reader.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = format!(
            "<h1>{}</h1><p>{}</p>",
            status.as_u16(),
            escape_html(&self.message)
        );

        let mut response = (status, Html(body)).into_response();
        response.extensions_mut().insert(ErrorPage {
            status,
            message: self.message,
        });
        response
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<BlogError> for WebError {
    fn from(err: BlogError) -> Self {
        match &err {
            BlogError::NotFound(_) => WebError::not_found("The page you requested does not exist."),
            BlogError::Validation(msg) => WebError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Internal error: {}", err);
                WebError::internal("An internal error occurred")
            }
        }
    }
}
