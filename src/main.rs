use clap::Parser;
use software_catalog::domain::ports::{SessionStore, SystemClock};
use software_catalog::utils::{logger, validation::Validate};
use software_catalog::{AppState, CliArgs, CouchStore, MemoryStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.resolve()?;

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting software-catalog API");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let store: Arc<dyn SessionStore> = if config.memory_store {
        tracing::warn!("Using the in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let couch = CouchStore::new(
            &config.database_url,
            &config.tech_database,
            &config.software_database,
        );
        couch.ensure_databases().await?;
        Arc::new(couch)
    };

    let state = AppState::new(store, Arc::new(SystemClock));
    let app = software_catalog::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
    }
}
