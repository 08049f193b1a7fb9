//! Instance Service Library
//!
//! InstanceInfo CRUD over HTTP. Every write lands in the relational record
//! store and is then mirrored into the search index; searches read the index
//! only.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod search;
pub mod service;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::InstanceServiceConfig;
use crate::infra::Database;
use crate::repository::InstanceInfoStore;
use crate::service::{InstanceInfoManager, InstanceInfoService};

/// Run the HTTP server with configuration from the environment.
///
/// `host` and `port` override the configured bind address when given.
pub async fn run_embedded(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = InstanceServiceConfig::from_env();
    if let Some(host) = host {
        config.service.host = host;
    }
    if let Some(port) = port {
        config.service.port = port;
    }
    run_server_with_config(config).await
}

/// Connect both stores and wire the service graph.
pub async fn build_state(
    config: &InstanceServiceConfig,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let database = Database::connect(&config.database).await?;
    let search_index = search::connect(&config.search).await?;

    let records = Arc::new(InstanceInfoStore::new(database.get_connection()));
    let instance_infos = Arc::new(
        InstanceInfoManager::new(records, search_index.clone())
            .with_reindex_batch_size(config.reindex_batch_size),
    );

    Ok(AppState::new(instance_infos, database, search_index))
}

/// Build the full router for a configuration.
pub async fn build_router(
    config: &InstanceServiceConfig,
) -> Result<Router, Box<dyn std::error::Error>> {
    Ok(create_router(build_state(config).await?))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = InstanceServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Rebuild the search index from the record store (for CLI commands).
pub async fn run_reindex() -> Result<u64, Box<dyn std::error::Error>> {
    let config = InstanceServiceConfig::from_env();
    let state = build_state(&config).await?;

    let count = state.instance_infos.reindex().await?;
    info!(count, index = %config.search.index, "Search index rebuilt");

    Ok(count)
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    config: InstanceServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config).await?;

    // Build address
    let addr: SocketAddr = config.service.addr().parse()?;
    info!("Instance service listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
