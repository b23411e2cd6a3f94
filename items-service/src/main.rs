use items_service::config::ItemsConfig;
use items_service::services::init_metrics;
use items_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = ItemsConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.store.backend,
        database = %config.mongodb.database,
        collection = %config.mongodb.collection,
        create_auth = %config.auth.create_level,
        list_auth = %config.auth.list_level,
        "Starting items service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
