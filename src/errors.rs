use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{imaging::DecodeError, runner::Error as RunnerError};

/// An error response, serialized as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct HTTPError {
    message: String,
    status_code: StatusCode,
}

impl HTTPError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}

impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DecodeError> for HTTPError {
    fn from(error: DecodeError) -> Self {
        Self::new(error.to_string())
    }
}

impl From<RunnerError> for HTTPError {
    fn from(error: RunnerError) -> Self {
        Self::new(error.to_string()).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
