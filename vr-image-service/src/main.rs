use service_core::observability::init_tracing;
use vr_image_service::config::VrImageConfig;
use vr_image_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("vr-image-service", "info", otlp_endpoint.as_deref());

    let config = VrImageConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
