//! AI provider abstractions and implementations.
//!
//! Handlers only see the `ImageProvider` and `TextProvider` traits, so the
//! Gemini backends can be swapped for mocks in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Mime type assumed when the provider does not report one.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::InvalidRequest(_) => "invalid_request",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// A single image returned by an image provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Raw image bytes (already base64-decoded).
    pub bytes: Vec<u8>,

    /// MIME type reported by the provider, if any.
    pub mime_type: Option<String>,
}

impl GeneratedImage {
    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME_TYPE)
    }

    /// Encode as `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// Image generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageParams {
    pub number_of_images: u32,
    pub aspect_ratio: String,
}

impl Default for ImageParams {
    /// One widescreen image, which is what the VR front-end renders.
    fn default() -> Self {
        Self {
            number_of_images: 1,
            aspect_ratio: "16:9".to_string(),
        }
    }
}

/// Trait for image generation providers (e.g., Imagen).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name for metrics and logs.
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate images. An empty vector means the provider answered with no images.
    async fn generate_images(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<Vec<GeneratedImage>, ProviderError>;
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for metrics and logs.
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate a text completion for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trips_bytes() {
        let bytes = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10];
        let image = GeneratedImage {
            bytes: bytes.clone(),
            mime_type: Some("image/png".to_string()),
        };

        let uri = image.to_data_uri();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let image = GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: None,
        };
        assert_eq!(image.to_data_uri(), "data:image/png;base64,AQID");
    }

    #[test]
    fn provider_mime_type_is_kept() {
        let image = GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: Some("image/jpeg".to_string()),
        };
        assert!(image.to_data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn default_params_request_one_widescreen_image() {
        let params = ImageParams::default();
        assert_eq!(params.number_of_images, 1);
        assert_eq!(params.aspect_ratio, "16:9");
    }
}
