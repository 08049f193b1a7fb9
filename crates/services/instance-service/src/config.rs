//! Instance service configuration.

use std::env;

use common::{DatabaseConfig, SearchBackend, SearchConfig, ServiceConfig};

/// Default number of rows mirrored per page by `reindex`
pub const DEFAULT_REINDEX_BATCH_SIZE: u64 = 100;

/// Instance service configuration.
#[derive(Debug, Clone)]
pub struct InstanceServiceConfig {
    /// HTTP server settings
    pub service: ServiceConfig,
    /// Record store settings
    pub database: DatabaseConfig,
    /// Search index settings
    pub search: SearchConfig,
    /// Rows mirrored per page when rebuilding the search index
    pub reindex_batch_size: u64,
}

impl InstanceServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let service = ServiceConfig {
            service_name: defaults.service.service_name,
            host: env::var("INSTANCE_SERVICE_HOST").unwrap_or(defaults.service.host),
            port: env::var("INSTANCE_SERVICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.service.port),
        };

        let database = DatabaseConfig {
            url: env::var("INSTANCE_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(defaults.database.url),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database.max_connections),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database.min_connections),
        };

        let backend = match env::var("SEARCH_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, defaults.search.backend);
                defaults.search.backend
            }),
            Err(_) => defaults.search.backend,
        };

        let search = SearchConfig {
            backend,
            url: env::var("ELASTICSEARCH_URL").unwrap_or(defaults.search.url),
            index: env::var("SEARCH_INDEX").unwrap_or(defaults.search.index),
            refresh_on_write: env::var("SEARCH_REFRESH_ON_WRITE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search.refresh_on_write),
        };

        Self {
            service,
            database,
            search,
            reindex_batch_size: env::var("REINDEX_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &u64| *size > 0)
                .unwrap_or(DEFAULT_REINDEX_BATCH_SIZE),
        }
    }

    /// Configuration backed entirely by in-process stores.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig::in_memory(),
            search: SearchConfig {
                backend: SearchBackend::Memory,
                ..SearchConfig::default()
            },
            ..Self::default()
        }
    }
}

impl Default for InstanceServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            search: SearchConfig::default(),
            reindex_batch_size: DEFAULT_REINDEX_BATCH_SIZE,
        }
    }
}
