use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/generate-image`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateImageRequest {
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful image generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    /// `data:<mime>;base64,<payload>`
    pub image_data: String,
    pub text: String,
}

/// Degraded response: the image call failed but a description was produced.
#[derive(Debug, Serialize)]
pub struct ImageFallbackResponse {
    pub success: bool,
    pub text: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prompt_fails_validation() {
        let req: GenerateImageRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_prompt_fails_validation() {
        let req: GenerateImageRequest = serde_json::from_str(r#"{"prompt":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn present_prompt_passes() {
        let req: GenerateImageRequest =
            serde_json::from_str(r#"{"prompt":"a titration bench"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn image_response_uses_camel_case() {
        let body = serde_json::to_value(GenerateImageResponse {
            success: true,
            image_data: "data:image/png;base64,AA==".to_string(),
            text: "ok".to_string(),
        })
        .unwrap();
        assert_eq!(body["imageData"], "data:image/png;base64,AA==");
        assert!(body.get("image_data").is_none());
    }
}
