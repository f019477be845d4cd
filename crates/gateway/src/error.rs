use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parley_rooms::RoomError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<RoomError> for ApiError {
    fn from(error: RoomError) -> Self {
        let status = match &error {
            RoomError::RoomNotFound
            | RoomError::MemberNotFound { .. }
            | RoomError::MessageNotFound => StatusCode::NOT_FOUND,
            RoomError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RoomError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RoomError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RoomError::VersionConflict { .. } => StatusCode::CONFLICT,
            RoomError::DependencyFailure { .. } => StatusCode::FAILED_DEPENDENCY,
        };

        if status == StatusCode::FAILED_DEPENDENCY {
            error!(%error, "dependency failure");
        }

        Self::new(status, error.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(error = ?error, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
    }
}
