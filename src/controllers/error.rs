use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;

/// Outcome of a failed request. The only place HTTP statuses are chosen.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Song with id {0} already exists")]
    Conflict(i64),

    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // 302: a song with this id is already there
            ApiError::Conflict(_) => StatusCode::FOUND,
            ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(id) => ApiError::Conflict(id),
            other => ApiError::Other(other.to_string()),
        }
    }
}

// A body that is not JSON is a generic failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Other(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::NotFound(_) | ApiError::Conflict(_) => {
                warn!("{}: {}", status, self);
                json!({ "message": self.to_string() })
            }
            ApiError::Other(message) => {
                error!("Request failed: {}", message);
                json!({ "error": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
