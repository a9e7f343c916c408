use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every failure the caller cannot act on
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Response envelope shared by the registration API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(user: T) -> Self {
        Self {
            success: true,
            message: None,
            user: Some(user),
        }
    }

    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message: Some(message.to_string()),
            user: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected submission: {}", msg);
                msg.clone()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {:?}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        let body = Json(ApiResponse::<()>::error(&message));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::Validation("Missing fields".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_and_persistence_collapse_to_500() {
        let storage = AppError::Storage("disk full".to_string());
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let persistence = AppError::Persistence(sqlx::Error::PoolClosed);
        assert_eq!(
            persistence.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_envelope_omits_user() {
        let body = serde_json::to_value(ApiResponse::<()>::error("Missing fields")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing fields");
        assert!(body.get("user").is_none());
    }
}
