use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const PARAGRAPH_REQUIRED: &str = "Paragraph is required";
pub const NO_IMAGES_GENERATED: &str = "No images generated";
pub const IMAGE_GENERATION_FAILED: &str = "Failed to generate image";

/// Handler errors. Each variant maps to one JSON envelope and status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(&'static str),

    /// The image provider answered without any image.
    #[error("No images generated")]
    EmptyResult,

    /// Anything else that went wrong while serving an image request.
    #[error("Failed to generate image: {0}")]
    ImageGeneration(String),

    /// Upstream failure while writing an image prompt.
    #[error("{0}")]
    PromptGeneration(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.to_string(), None),
            ApiError::EmptyResult => (
                StatusCode::INTERNAL_SERVER_ERROR,
                NO_IMAGES_GENERATED.to_string(),
                None,
            ),
            ApiError::ImageGeneration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                IMAGE_GENERATION_FAILED.to_string(),
                Some(msg),
            ),
            ApiError::PromptGeneration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_is_bare_error() {
        let (status, body) = body_of(ApiError::Validation(PROMPT_REQUIRED)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Prompt is required"}));
    }

    #[tokio::test]
    async fn image_generation_carries_message() {
        let (status, body) = body_of(ApiError::ImageGeneration("timeout".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Failed to generate image", "message": "timeout"})
        );
    }

    #[tokio::test]
    async fn prompt_generation_error_is_the_message() {
        let (status, body) = body_of(ApiError::PromptGeneration("Rate limited".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Rate limited"}));
    }
}
