use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/generate-image-prompt`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePromptRequest {
    #[validate(required, length(min = 1))]
    #[serde(default)]
    pub experiment_details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePromptResponse {
    pub success: bool,
    pub prompt: String,
}
