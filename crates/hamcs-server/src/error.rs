//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use hamcs_core::{DiffError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::IndexOutOfRange { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::MissingField { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Diff(DiffError::MissingKey(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Store(StoreError::NotFound) => "NOT_FOUND",
            ApiError::Store(StoreError::IndexOutOfRange { .. }) => "INDEX_OUT_OF_RANGE",
            ApiError::Store(StoreError::MissingField { .. }) => "MISSING_FIELD",
            ApiError::Diff(DiffError::MissingKey(_)) => "MISSING_KEY",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(%status, error = %self, "request failed");
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
