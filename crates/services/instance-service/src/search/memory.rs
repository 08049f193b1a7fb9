//! In-process search index.
//!
//! Backs local runs and router tests. Writes are visible to the next read.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{InstanceInfoSearchIndex, SearchQuery};
use common::AppResult;
use domain::InstanceInfo;

/// Documents keyed by id.
#[derive(Default)]
pub struct InMemorySearchIndex {
    documents: RwLock<BTreeMap<i64, InstanceInfo>>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl InstanceInfoSearchIndex for InMemorySearchIndex {
    async fn find_one(&self, id: i64) -> AppResult<Option<InstanceInfo>> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn save(&self, instance_info: &InstanceInfo) -> AppResult<()> {
        let id = instance_info.require_id()?;
        self.documents.write().await.insert(id, instance_info.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.documents.write().await.remove(&id);
        Ok(())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.documents.read().await.contains_key(&id))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<InstanceInfo>> {
        let query = SearchQuery::parse(query)?;

        Ok(self
            .documents
            .read()
            .await
            .values()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect())
    }

    async fn delete_all(&self) -> AppResult<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
