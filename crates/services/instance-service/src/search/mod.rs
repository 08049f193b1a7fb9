//! Search index layer - the query-optimized mirror of the record store.
//!
//! Documents are keyed by the record store id. Nothing here ever reads the
//! record store; keeping the two in step is the service layer's job.

mod elastic;
mod memory;
pub mod query;

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppResult, SearchBackend, SearchConfig};
use domain::InstanceInfo;

pub use elastic::{ElasticsearchError, ElasticsearchIndex};
pub use memory::InMemorySearchIndex;
pub use query::SearchQuery;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Search index contract.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InstanceInfoSearchIndex: Send + Sync {
    /// Find the document for an ID
    async fn find_one(&self, id: i64) -> AppResult<Option<InstanceInfo>>;

    /// Upsert the document by ID, replacing every field
    async fn save(&self, instance_info: &InstanceInfo) -> AppResult<()>;

    /// Remove the document for an ID (absent documents are not an error)
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Check whether a document exists
    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Run a `field:value` query against the index
    async fn search(&self, query: &str) -> AppResult<Vec<InstanceInfo>>;

    /// Drop every document (fixture setup and reindexing only)
    async fn delete_all(&self) -> AppResult<()>;

    /// Check index connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Build the search index selected by configuration.
pub async fn connect(config: &SearchConfig) -> AppResult<Arc<dyn InstanceInfoSearchIndex>> {
    let index: Arc<dyn InstanceInfoSearchIndex> = match config.backend {
        SearchBackend::Elasticsearch => Arc::new(ElasticsearchIndex::connect(config).await?),
        SearchBackend::Memory => Arc::new(InMemorySearchIndex::new()),
    };

    tracing::info!(backend = %config.backend, index = %config.index, "Search index ready");
    Ok(index)
}
