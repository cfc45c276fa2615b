//! Google generative AI provider implementations.
//!
//! Text goes through Gemini `generateContent`; images go through the Imagen
//! `predict` endpoint of the same REST API.

use super::{GeneratedImage, ImageParams, ImageProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// State shared by the text and image providers.
struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Google API key not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &T,
    ) -> Result<Response, ProviderError> {
        self.ensure_configured()?;

        let response = self
            .client
            .post(self.api_url(method))
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(status_error(status, &error_text))
    }
}

/// Map a non-success HTTP status into a provider error.
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited;
    }

    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    let message = format!("Gemini API error {}: {}", status, message);
    if status == StatusCode::BAD_REQUEST {
        ProviderError::InvalidRequest(message)
    } else {
        ProviderError::ApiError(message)
    }
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    inner: GeminiClient,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            inner: GeminiClient::new(config)?,
        })
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.inner.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![ContentPart::Text {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            model = %self.inner.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let api_response: GenerateContentResponse = self
            .inner
            .post("generateContent", &request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response.into_text()
    }
}

/// Imagen image provider.
pub struct GeminiImageProvider {
    inner: GeminiClient,
}

impl GeminiImageProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            inner: GeminiClient::new(config)?,
        })
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    fn name(&self) -> &str {
        "imagen"
    }

    fn model(&self) -> &str {
        &self.inner.config.model
    }

    async fn generate_images(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: params.number_of_images,
                aspect_ratio: params.aspect_ratio.clone(),
            },
        };

        tracing::debug!(
            model = %self.inner.config.model,
            prompt_len = prompt.len(),
            sample_count = params.number_of_images,
            aspect_ratio = %params.aspect_ratio,
            "Sending request to Imagen API"
        );

        let api_response: PredictResponse = self
            .inner
            .post("predict", &request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response.into_images()
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String, ProviderError> {
        if self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
            .is_some()
        {
            return Err(ProviderError::ContentFiltered);
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError("Response contained no candidates".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ProviderError::ContentFiltered);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text),
                ContentPart::Other(_) => None,
            })
            .collect();

        if text.is_empty() {
            return Err(ProviderError::ApiError(
                "Response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl PredictResponse {
    /// Decode image payloads. Predictions without bytes (filtered) are skipped.
    fn into_images(self) -> Result<Vec<GeneratedImage>, ProviderError> {
        self.predictions
            .into_iter()
            .filter_map(|p| p.bytes_base64_encoded.map(|b| (b, p.mime_type)))
            .map(|(encoded, mime_type)| {
                let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                    ProviderError::ApiError(format!("Invalid image payload: {}", e))
                })?;
                Ok(GeneratedImage { bytes, mime_type })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: Secret::new(api_key.to_string()),
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://example.test/v1beta/".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn api_url_includes_model_and_method() {
        let client = GeminiClient::new(config("key")).unwrap();
        assert_eq!(
            client.api_url("generateContent"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn empty_api_key_is_not_configured() {
        let provider = GeminiTextProvider::new(config("")).unwrap();
        let err = provider.generate("Hello, world!").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn predict_request_matches_imagen_shape() {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "a lab bench".to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9".to_string(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "instances": [{"prompt": "a lab bench"}],
                "parameters": {"sampleCount": 1, "aspectRatio": "16:9"}
            })
        );
    }

    #[test]
    fn predict_response_decodes_images() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions":[{"bytesBase64Encoded":"AQID","mimeType":"image/png"}]}"#,
        )
        .unwrap();
        let images = response.into_images().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].bytes, vec![1, 2, 3]);
        assert_eq!(images[0].mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn predict_response_without_predictions_is_empty() {
        let response: PredictResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_images().unwrap().is_empty());
    }

    #[test]
    fn filtered_predictions_are_skipped() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predictions":[{"raiFilteredReason":"blocked"}]}"#,
        )
        .unwrap();
        assert!(response.into_images().unwrap().is_empty());
    }

    #[test]
    fn invalid_base64_is_an_api_error() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"predictions":[{"bytesBase64Encoded":"***"}]}"#).unwrap();
        assert!(matches!(
            response.into_images(),
            Err(ProviderError::ApiError(_))
        ));
    }

    #[test]
    fn text_parts_are_concatenated() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello"},{"text":", lab"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello, lab");
    }

    #[test]
    fn safety_finish_reason_is_filtered() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[]},"finishReason":"SAFETY"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text(), Err(ProviderError::ContentFiltered));
    }

    #[test]
    fn blocked_prompt_is_filtered() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(response.into_text(), Err(ProviderError::ContentFiltered));
    }

    #[test]
    fn bad_request_extracts_api_message() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            err,
            ProviderError::InvalidRequest(
                "Gemini API error 400 Bad Request: API key not valid".to_string()
            )
        );
    }

    #[test]
    fn unparseable_error_body_is_kept_verbatim() {
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "upstream overloaded");
        assert_eq!(
            err,
            ProviderError::ApiError(
                "Gemini API error 503 Service Unavailable: upstream overloaded".to_string()
            )
        );
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            ProviderError::RateLimited
        );
    }
}
