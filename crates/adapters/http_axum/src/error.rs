//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sunswitch_domain::error::{SunswitchError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SunswitchError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SunswitchError);

impl From<SunswitchError> for ApiError {
    fn from(err: SunswitchError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SunswitchError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SunswitchError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SunswitchError::Solar(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
