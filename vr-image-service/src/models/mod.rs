//! Request and response payloads for the VR image HTTP API.

pub mod image;
pub mod prompt;
pub mod status;

pub use image::{GenerateImageRequest, GenerateImageResponse, ImageFallbackResponse};
pub use prompt::{GeneratePromptRequest, GeneratePromptResponse};
pub use status::{HealthResponse, TestResponse};
