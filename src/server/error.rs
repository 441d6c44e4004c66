// ABOUTME: HTTP rendering of gateway failures.
// ABOUTME: Maps each error kind to a status code and a JSON error body.

use crate::gateway::{ErrorKind, OperationError};
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Anything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The request body could not be decoded at all.
    #[error("malformed request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log: Option<&'a [String]>,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::InUse | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidSpec | ErrorKind::BuildFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::AuthRequired => StatusCode::UNAUTHORIZED,
        ErrorKind::BackendUnreachable => StatusCode::BAD_GATEWAY,
        ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Operation(e) => {
                let body = ErrorBody {
                    kind: e.kind().as_str(),
                    message: e.to_string(),
                    log: e.build_log(),
                };
                (status_for(e.kind()), Json(body)).into_response()
            }
            ApiError::BadRequest(message) => {
                tracing::debug!(%message, "rejected malformed request");
                let body = ErrorBody {
                    kind: "bad_request",
                    message: message.clone(),
                    log: None,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}
