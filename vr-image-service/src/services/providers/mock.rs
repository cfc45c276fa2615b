//! Mock provider implementations for testing.

use super::{GeneratedImage, ImageParams, ImageProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Scripted outcome for `MockImageProvider`.
#[derive(Debug, Clone)]
pub enum MockImageOutcome {
    Images(Vec<GeneratedImage>),
    Fail(ProviderError),
}

/// Mock image provider for testing.
pub struct MockImageProvider {
    outcome: MockImageOutcome,
    calls: Mutex<Vec<(String, ImageParams)>>,
}

impl MockImageProvider {
    pub fn new(outcome: MockImageOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always return a single image with the given bytes and mime type.
    pub fn returning(bytes: Vec<u8>, mime_type: Option<&str>) -> Self {
        Self::new(MockImageOutcome::Images(vec![GeneratedImage {
            bytes,
            mime_type: mime_type.map(str::to_string),
        }]))
    }

    pub fn empty() -> Self {
        Self::new(MockImageOutcome::Images(Vec::new()))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockImageOutcome::Fail(error))
    }

    /// Prompts and parameters received so far.
    pub fn calls(&self) -> Vec<(String, ImageParams)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-image"
    }

    async fn generate_images(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), params.clone()));
        }

        match &self.outcome {
            MockImageOutcome::Images(images) => Ok(images.clone()),
            MockImageOutcome::Fail(error) => Err(error.clone()),
        }
    }
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    reply: Result<String, ProviderError>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-text"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.reply.clone()
    }
}
