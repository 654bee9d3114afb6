//! HTTP server for the Bible study API
//!
//! Configuration comes from the environment (see `AppConfig::from_env`).
//! `BIBLE_BACKEND=memory` serves the bundled sample dataset without a
//! database.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bible_study::api::{create_router, AppState};
use bible_study::config::{AppConfig, Backend};
use bible_study::database::{mask_database_url, DatabaseConfig, DatabaseManager};
use bible_study::store::sample::sample_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("bible_web_server=info,bible_study=info,tower_http=debug")
            }),
        )
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;

    let state = match config.backend {
        Backend::Memory => {
            info!("Serving the bundled sample dataset from memory");
            let store = Arc::new(sample_store().await);
            AppState::new(store.clone(), store, &config)
        }
        Backend::Postgres => {
            info!(
                "Using PostgreSQL at {}",
                mask_database_url(&config.database_url)
            );
            let manager = DatabaseManager::new(DatabaseConfig::from(&config))
                .await
                .context("connecting to the database")?;
            manager
                .test_connection()
                .await
                .context("testing the database connection")?;
            manager.verify_schema().await.context("verifying schema")?;
            info!("Database ready ({})", manager.connection_stats());
            AppState::new(
                Arc::new(manager.bible_store()),
                Arc::new(manager.annotation_store()),
                &config,
            )
        }
    };

    // Build our application with routes
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
