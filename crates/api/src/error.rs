use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use jobboard_errors::JobBoardError;

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound(Vec<String>),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("bad request")]
    BadRequest(Vec<String>),

    #[error("authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("insufficient permissions")]
    Forbidden,

    #[error("storage error: {0}")]
    JobBoard(#[from] JobBoardError),

    #[error("internal server error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, messages) = match self {
            ApiError::NotFound(messages) => (StatusCode::NOT_FOUND, "NOT_FOUND", messages),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", vec![message])
            }
            ApiError::BadRequest(messages) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", messages)
            }
            ApiError::Authentication(err) => (
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_ERROR",
                vec![err.to_string()],
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                vec!["Not allowed to perform this action".to_string()],
            ),
            ApiError::JobBoard(JobBoardError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", vec![message])
            }
            ApiError::JobBoard(err) => {
                error!(error = %err, "request failed with storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    vec!["Something went wrong, try again later".to_string()],
                )
            }
            ApiError::Internal(message) => {
                error!(error = %message, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    vec!["Something went wrong, try again later".to_string()],
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": messages.join(", "),
                "messages": messages,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}
