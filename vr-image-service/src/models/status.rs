use serde::Serialize;

pub const HEALTHY_MESSAGE: &str = "VR Image Generation API is running";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            message: HEALTHY_MESSAGE,
        }
    }
}

/// Outcome of the API key check. `text_response` stays snake_case on the wire.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_response: Option<String>,
}

impl TestResponse {
    pub fn success(text_response: String) -> Self {
        Self {
            status: "success",
            message: "API key is working correctly".to_string(),
            text_response: Some(text_response),
        }
    }

    pub fn failure(reason: impl std::fmt::Display) -> Self {
        Self {
            status: "error",
            message: format!("API key test failed: {}", reason),
            text_response: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_omits_text_response() {
        let body = serde_json::to_value(TestResponse::failure("bad key")).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "API key test failed: bad key");
        assert!(body.get("text_response").is_none());
    }
}
