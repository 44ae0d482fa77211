//! `taskflowd` — the taskflow agent server binary.
//!
//! Loads configuration from the environment, builds the service, and serves
//! the HTTP surface until interrupted.

use std::sync::Arc;

use taskflow_service::{http, ServiceConfig, WorkflowService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env();
    log::info!("Task storage: {}", config.storage_file.display());
    log::info!("Execution log: {}", config.logs_file.display());
    log::info!(
        "Classifier model '{}' via Ollama at {}",
        config.classifier.model,
        config.classifier.base_url
    );

    let listen = config.listen.clone();
    let service = Arc::new(WorkflowService::new(config));
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    log::info!("taskflow server listening on {}", listen);
    log::info!("Webhook endpoint: POST http://{}/webhook/task", listen);
    log::info!("Health check: GET http://{}/health", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
