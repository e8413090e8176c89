use crate::core::DiscoveryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// HTTP-facing error: a status code and a message
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

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Get HTTP status code for a manager error
pub fn status_code(err: &DiscoveryError) -> StatusCode {
    match err {
        DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
        DiscoveryError::Validation(_) => StatusCode::BAD_REQUEST,
        DiscoveryError::NodeNamePresent { .. } | DiscoveryError::NodeAddressPresent { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DiscoveryError::AlreadyExists(_)
        | DiscoveryError::Encoding(_)
        | DiscoveryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        Self::new(status_code(&err), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = self.status.canonical_reason().unwrap_or("Error");
        if self.status.is_server_error() {
            error!("{}: {}", reason, self.message);
        } else {
            warn!("{}: {}", reason, self.message);
        }

        let body = Json(json!({
            "error": self.message,
            "code": self.status.as_u16(),
        }));

        (self.status, body).into_response()
    }
}
