//! Request-level error boundary.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::users::repo::StoreError;

/// Every non-success outcome a handler can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User does not exist. ")]
    UserNotFound,

    #[error("Invalid credentials. ")]
    InvalidCredentials,

    #[error("Email already registered. ")]
    EmailTaken,

    #[error("Access Denied")]
    MissingToken,

    #[error("{0}")]
    InvalidToken(String),

    #[error("User not found. ")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::FORBIDDEN,
            ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmailTaken | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // login failures answer with `msg`, everything else with `error`
        let body = match self {
            ApiError::UserNotFound | ApiError::InvalidCredentials => {
                json!({ "msg": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ApiError::EmailTaken,
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Internal(anyhow::anyhow!(e.body_text()))
    }
}
