//! Request-level failures and their HTTP mapping.
//!
//! Only precondition failures become non-200 responses. Hardware failures
//! during actuation are reported in-band, see [`crate::handlers::Envelope`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use latchkey_core::Capability;
use serde_json::json;
use thiserror::Error;

/// Rejections raised before a door operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad secret")]
    BadSecret,

    #[error("door not found")]
    DoorNotFound,

    /// The door has no channel wired for the requested operation.
    #[error("door does not support {0}")]
    Unsupported(Capability),

    /// No route matched.
    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadSecret => StatusCode::FORBIDDEN,
            Self::DoorNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unsupported(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
