use crate::error::{ApiError, PARAGRAPH_REQUIRED, PROMPT_REQUIRED};
use crate::handlers::validated;
use crate::models::{
    GenerateImageRequest, GenerateImageResponse, GeneratePromptRequest, GeneratePromptResponse,
    ImageFallbackResponse,
};
use crate::services::metrics::{observe_provider_call, record_image_outcome};
use crate::services::prompts::{fallback_description_prompt, image_prompt_instruction};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub const IMAGE_SUCCESS_TEXT: &str = "Image generated successfully with Google Gemini";

/// `POST /api/generate-image`
///
/// Provider errors degrade to a 400 carrying a text description of the image;
/// an empty result is a hard 500.
pub async fn generate_image(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let prompt = validated(payload, PROMPT_REQUIRED)?
        .prompt
        .ok_or(ApiError::Validation(PROMPT_REQUIRED))?;

    tracing::info!(prompt = %prompt, "Generating image");

    let provider = state.image_provider.as_ref();
    let result = observe_provider_call(
        provider.name(),
        provider.model(),
        provider.generate_images(&prompt, &state.image_params),
    )
    .await;

    match result {
        Ok(images) => {
            let Some(image) = images.into_iter().next() else {
                tracing::warn!("Image provider returned no images");
                record_image_outcome("empty");
                return Err(ApiError::EmptyResult);
            };

            record_image_outcome("success");
            Ok(Json(GenerateImageResponse {
                success: true,
                image_data: image.to_data_uri(),
                text: IMAGE_SUCCESS_TEXT.to_string(),
            })
            .into_response())
        }
        Err(model_error) => {
            tracing::warn!(error = %model_error, "Model error, falling back to text description");

            let text_provider = state.text_provider.as_ref();
            let description = observe_provider_call(
                text_provider.name(),
                text_provider.model(),
                text_provider.generate(&fallback_description_prompt(&prompt)),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error generating image");
                record_image_outcome("failed");
                ApiError::ImageGeneration(e.to_string())
            })?;

            record_image_outcome("fallback");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(ImageFallbackResponse {
                    success: false,
                    text: description,
                    error: format!(
                        "Image generation failed: {}. Using text description instead.",
                        model_error
                    ),
                }),
            )
                .into_response())
        }
    }
}

/// `POST /api/generate-image-prompt`
pub async fn generate_image_prompt(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePromptRequest>, JsonRejection>,
) -> Result<Json<GeneratePromptResponse>, ApiError> {
    let experiment_details = validated(payload, PARAGRAPH_REQUIRED)?
        .experiment_details
        .ok_or(ApiError::Validation(PARAGRAPH_REQUIRED))?;

    let provider = state.prompt_provider.as_ref();
    let prompt = observe_provider_call(
        provider.name(),
        provider.model(),
        provider.generate(&image_prompt_instruction(&experiment_details)),
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Error generating image prompt");
        ApiError::PromptGeneration(e.to_string())
    })?;

    Ok(Json(GeneratePromptResponse {
        success: true,
        prompt: prompt.trim().to_string(),
    }))
}
