use crate::models::{HealthResponse, TestResponse};
use crate::services::metrics::observe_provider_call;
use crate::services::prompts::API_TEST_PROMPT;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// `GET /api/health`: liveness only, never touches the provider.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// `GET /api/test`: round-trip a trivial prompt to verify the API key.
pub async fn test_api(State(state): State<AppState>) -> (StatusCode, Json<TestResponse>) {
    let provider = state.text_provider.as_ref();
    let result = observe_provider_call(
        provider.name(),
        provider.model(),
        provider.generate(API_TEST_PROMPT),
    )
    .await;

    match result {
        Ok(text) => (StatusCode::OK, Json(TestResponse::success(text))),
        Err(e) => {
            tracing::error!(error = %e, "API key test failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestResponse::failure(e)),
            )
        }
    }
}
