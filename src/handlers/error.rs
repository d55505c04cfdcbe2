// handlers/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::errors::{RepoError, RepoErrorKind, ServiceError};

/// Transport-facing error. Bodies only ever carry the fixed text of the kind.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or invalid request body (400)
    InvalidRequest,
    Service(ServiceError),
    Repo(RepoError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::Service(e) => match e {
                ServiceError::MessageAlreadyExists | ServiceError::MessageNotFound => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::CannotCreateMessage | ServiceError::CannotGetMessage => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Repo(e) => match e.kind() {
                RepoErrorKind::NotFound => StatusCode::BAD_REQUEST,
                RepoErrorKind::AlreadyExists => StatusCode::BAD_REQUEST,
                RepoErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Log the actual error, return generic message
            match &self {
                ApiError::Repo(e) => error!(op = e.op(), cause = ?e.store_error(), "request failed"),
                other => error!(error = ?other, "request failed"),
            }
            "internal server error".to_string()
        } else {
            match &self {
                ApiError::InvalidRequest => "invalid request body".to_string(),
                ApiError::Service(e) => e.to_string(),
                ApiError::Repo(e) => e.to_string(),
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        Self::Repo(e)
    }
}
