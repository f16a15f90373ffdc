use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Partner API error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Purchase protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Validation failures echo the field name; nothing was sent upstream.
            AppError::MissingField(ref name) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Missing field: {}", name) })),
            )
                .into_response(),

            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }

            AppError::NotFound(ref msg) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    success: false,
                    message: msg.clone(),
                }),
            )
                .into_response(),

            // The raw partner error stays in the server log; callers get a
            // fixed message with no upstream detail.
            AppError::Upstream(ref detail) => {
                tracing::error!("partner API call failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        success: false,
                        message:
                            "Something went wrong with the partner API, please try again later"
                                .to_string(),
                    }),
                )
                    .into_response()
            }

            AppError::ProtocolViolation(ref msg) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    success: false,
                    message: msg.clone(),
                }),
            )
                .into_response(),

            AppError::Internal(ref msg) => {
                tracing::error!("internal error: {}", msg);
                // No stack here: by the time a Result-path error renders,
                // the failing frame is long gone.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(internal_error_body(msg, false)),
                )
                    .into_response()
            }
        }
    }
}

/// 500 body for unhandled errors. Whether the stack is attached is decided
/// by the caller from config, not from ambient environment state.
pub fn internal_error_body(message: &str, include_stack: bool) -> serde_json::Value {
    if include_stack {
        let stack = std::backtrace::Backtrace::force_capture().to_string();
        json!({ "error": 500, "message": message, "stack": stack })
    } else {
        json!({ "error": 500, "message": message })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_field_is_400_and_names_the_field() {
        let (status, body) = body_json(AppError::MissingField("steamId".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing field: steamId");
    }

    #[tokio::test]
    async fn upstream_error_hides_partner_detail() {
        let (status, body) =
            body_json(AppError::Upstream("connection refused to partner".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("connection refused"));
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = body_json(AppError::NotFound("no product".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn internal_error_body_attaches_stack_only_when_asked() {
        let with_stack = internal_error_body("boom", true);
        assert_eq!(with_stack["error"], 500);
        assert!(with_stack["stack"].is_string());

        let without_stack = internal_error_body("boom", false);
        assert_eq!(without_stack["message"], "boom");
        assert!(without_stack.get("stack").is_none());
    }
}
