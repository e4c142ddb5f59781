use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blob_store::BlobError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, ToSchema, Serialize, Deserialize)]
pub struct GatewayAPIError {
    #[serde(skip)]
    status_code: StatusCode,
    message: String,
}

impl GatewayAPIError {
    pub fn new(status_code: StatusCode, message: &str) -> Self {
        Self {
            status_code,
            message: message.to_string(),
        }
    }

    pub fn internal_error(e: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", e))
    }

    pub fn internal_error_str(e: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for GatewayAPIError {
    fn into_response(self) -> Response {
        error!("API Error: {} - {}", self.status_code(), self.message());
        (self.status_code, self.message).into_response()
    }
}

impl From<BlobError> for GatewayAPIError {
    fn from(e: BlobError) -> Self {
        let message = e.to_string();
        match e {
            BlobError::NotFound { .. } => Self::not_found(&message),
            BlobError::GenerationMismatch { .. } => Self::conflict(&message),
            BlobError::InvalidKey { .. } => Self::bad_request(&message),
            BlobError::InvalidUri { .. } | BlobError::Store { .. } => {
                Self::internal_error_str(&message)
            }
        }
    }
}
