//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Chat transport failures are deliberately absent: a failed send or
//! receive on a WebSocket evicts that one connection and is never
//! surfaced as an error to anybody.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid filename: \"..\"",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Client-supplied filename reduced to nothing usable.
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    /// Multipart request carried no `file` field.
    #[error("multipart request missing a `file` field")]
    MissingFile,

    /// Multipart body could not be parsed or streamed.
    #[error("malformed multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Upload could not be written to disk.
    #[error("upload storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// QR code could not be encoded or written.
    #[error("qr generation failed: {0}")]
    Qr(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidFilename(_) => 1001,
            Self::MissingFile => 1002,
            Self::Multipart(_) => 1003,
            Self::Storage(_) => 3001,
            Self::Qr(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFilename(_) | Self::MissingFile | Self::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) | Self::Qr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
