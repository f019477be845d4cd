//! Error types for the room system.

use thiserror::Error;

/// Result type alias for room operations
pub type RoomResult<T> = Result<T, RoomError>;

/// Main error type for the room system
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room does not exist")]
    RoomNotFound,

    #[error("member {id} is not in the room")]
    MemberNotFound { id: String },

    #[error("message does not exist")]
    MessageNotFound,

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    #[error("room {id} was modified concurrently")]
    VersionConflict { id: String },

    #[error("dependency failure: {message}")]
    DependencyFailure { message: String },
}

impl RoomError {
    /// Create a not found error for a room member
    pub fn member_not_found(id: impl Into<String>) -> Self {
        Self::MemberNotFound { id: id.into() }
    }

    /// Create a forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    /// Create a version conflict error for a room
    pub fn version_conflict(id: impl Into<String>) -> Self {
        Self::VersionConflict { id: id.into() }
    }

    /// Create a dependency failure error
    pub fn dependency_failure(message: impl Into<String>) -> Self {
        Self::DependencyFailure {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RoomError {
    fn from(err: reqwest::Error) -> Self {
        Self::DependencyFailure {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RoomError {
    fn from(err: serde_json::Error) -> Self {
        Self::DependencyFailure {
            message: format!("document decoding error: {err}"),
        }
    }
}
