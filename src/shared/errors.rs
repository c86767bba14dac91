use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Core failure taxonomy. Every store and dispatcher operation fails fast
/// with one of these; nothing leaves a partially mutated record behind.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("failed to send WhatsApp message")]
    SendFailed,
    #[error("backend request failed: {0}")]
    Network(String),
}

impl CrmError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            CrmError::Validation(_) => StatusCode::BAD_REQUEST,
            CrmError::SendFailed => StatusCode::BAD_GATEWAY,
            CrmError::Network(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
