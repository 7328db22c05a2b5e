use axum::{
    Json,
    body::Body,
    extract::rejection::{JsonRejection, PathRejection},
    http::{Response, StatusCode},
    response::IntoResponse,
};

use crate::services::song::CatalogError;

/// Failure of an HTTP handler, mapped onto a status code with a JSON `{"error": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unprocessable(String),
    // Request didn't make it past an extractor
    Rejected(StatusCode, String),
    // Produced via `Err(some_err).wrap_err("Some context")?`
    Internal(color_eyre::Report),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::MissingField(_) => ApiError::Unprocessable(err.to_string()),
            CatalogError::Store(report) => ApiError::Internal(report),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<color_eyre::Report> for ApiError {
    fn from(err: color_eyre::Report) -> Self {
        ApiError::Internal(err)
    }
}

// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response<Body> {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Rejected(status, message) => (status, message),
            ApiError::Internal(err) => {
                // The full report stays in the log, clients only get a generic message
                log::error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
