//! Application startup and lifecycle management.
//!
//! Providers are constructed once from `VrImageConfig` and shared with every
//! handler through `AppState`.

use crate::config::VrImageConfig;
use crate::handlers::{
    health::{health_check, test_api},
    image::{generate_image, generate_image_prompt},
    metrics::metrics,
};
use crate::middleware::metrics_middleware;
use crate::services::metrics::init_metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiImageProvider, GeminiTextProvider};
use crate::services::providers::{ImageParams, ImageProvider, TextProvider};
use axum::{
    http::Uri,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub image_provider: Arc<dyn ImageProvider>,
    /// Writes image prompts from experiment details.
    pub prompt_provider: Arc<dyn TextProvider>,
    /// Fallback descriptions and the API key test.
    pub text_provider: Arc<dyn TextProvider>,
    pub image_params: ImageParams,
}

impl AppState {
    /// Build Gemini-backed providers from configuration.
    pub fn from_config(config: &VrImageConfig) -> Result<Self, AppError> {
        let gemini_config = |model: &str| GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: model.to_string(),
            api_base: config.google.api_base.clone(),
            timeout: Duration::from_secs(config.google.request_timeout_secs),
        };

        let image_provider: Arc<dyn ImageProvider> = Arc::new(
            GeminiImageProvider::new(gemini_config(&config.models.image_model))
                .map_err(provider_init_error)?,
        );
        let prompt_provider: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(gemini_config(&config.models.prompt_model))
                .map_err(provider_init_error)?,
        );
        let text_provider: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(gemini_config(&config.models.text_model))
                .map_err(provider_init_error)?,
        );

        tracing::info!(
            image_model = %config.models.image_model,
            prompt_model = %config.models.prompt_model,
            text_model = %config.models.text_model,
            "Initialized Gemini providers"
        );

        Ok(Self {
            image_provider,
            prompt_provider,
            text_provider,
            image_params: ImageParams::default(),
        })
    }
}

fn provider_init_error(e: impl std::fmt::Display) -> AppError {
    AppError::ConfigError(anyhow::anyhow!("Failed to initialize provider: {}", e))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{}", uri.path()))
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    init_metrics();

    Router::new()
        .route("/api/generate-image", post(generate_image))
        .route("/api/generate-image-prompt", post(generate_image_prompt))
        .route("/api/health", get(health_check))
        .route("/api/test", get(test_api))
        .route("/metrics", get(metrics))
        .route_layer(from_fn(metrics_middleware))
        .fallback(not_found)
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Any origin may call the API
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: VrImageConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(config.common.port, state).await
    }

    /// Bind the listener for an already assembled state (port 0 = random port for testing).
    pub async fn build_with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("VR image service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
