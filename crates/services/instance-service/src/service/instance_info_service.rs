//! InstanceInfo service - dual writes to the record store and the search index.
//!
//! Every mutation hits the record store first and the search index second,
//! sequentially on the calling task. There is no compensation when the second
//! write fails: the error is returned and the stores disagree until the next
//! write for that id or a `reindex`.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::InstanceInfo;

use crate::repository::InstanceInfoRepository;
use crate::search::InstanceInfoSearchIndex;
use crate::types::{Page, PageRequest, Sort, SortField};

/// Concurrent search index writes while reindexing one page
const REINDEX_CONCURRENCY: usize = 8;

/// InstanceInfo service trait for dependency injection.
#[async_trait]
pub trait InstanceInfoService: Send + Sync {
    /// Persist a new instance and mirror it into the search index
    async fn create(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo>;

    /// Overwrite an existing instance in both stores
    async fn update(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo>;

    /// Get an instance from the record store
    async fn get(&self, id: i64) -> AppResult<InstanceInfo>;

    /// List one page of instances from the record store
    async fn list(&self, sort: Option<Sort>, page: PageRequest) -> AppResult<Page<InstanceInfo>>;

    /// Remove an instance from both stores (absent ids succeed)
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Query the search index
    async fn search(&self, query: &str) -> AppResult<Vec<InstanceInfo>>;

    /// Rebuild the search index from the record store, returning the document count
    async fn reindex(&self) -> AppResult<u64>;
}

/// Concrete implementation of InstanceInfoService.
pub struct InstanceInfoManager {
    records: Arc<dyn InstanceInfoRepository>,
    index: Arc<dyn InstanceInfoSearchIndex>,
    reindex_batch_size: u64,
}

impl InstanceInfoManager {
    /// Create new service instance over both stores
    pub fn new(
        records: Arc<dyn InstanceInfoRepository>,
        index: Arc<dyn InstanceInfoSearchIndex>,
    ) -> Self {
        Self {
            records,
            index,
            reindex_batch_size: crate::config::DEFAULT_REINDEX_BATCH_SIZE,
        }
    }

    /// Rows mirrored per page by `reindex`
    pub fn with_reindex_batch_size(mut self, size: u64) -> Self {
        self.reindex_batch_size = size.max(1);
        self
    }

    /// Second write of every mutation. Failures are logged and returned as-is.
    async fn mirror(&self, saved: &InstanceInfo) -> AppResult<()> {
        self.index.save(saved).await.map_err(|e| {
            tracing::warn!(
                id = ?saved.id,
                error = %e,
                "InstanceInfo written to record store but not mirrored to search index"
            );
            e
        })
    }
}

#[async_trait]
impl InstanceInfoService for InstanceInfoManager {
    async fn create(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo> {
        instance_info.validate()?;
        if !instance_info.is_new() {
            return Err(AppError::internal(
                "A new instanceInfo cannot already have an ID",
            ));
        }

        let saved = self.records.save(instance_info).await?;
        self.mirror(&saved).await?;

        tracing::info!(id = ?saved.id, "InstanceInfo created");
        Ok(saved)
    }

    async fn update(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo> {
        instance_info.validate()?;
        let Some(id) = instance_info.id else {
            return self.create(instance_info).await;
        };

        if !self.records.exists(id).await? {
            return Err(AppError::NotFound);
        }

        let saved = self.records.save(instance_info).await?;
        self.mirror(&saved).await?;

        tracing::info!(id, "InstanceInfo updated");
        Ok(saved)
    }

    async fn get(&self, id: i64) -> AppResult<InstanceInfo> {
        self.records.find_one(id).await?.ok_or_not_found()
    }

    async fn list(&self, sort: Option<Sort>, page: PageRequest) -> AppResult<Page<InstanceInfo>> {
        self.records.find_page(sort, page).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.records.delete(id).await?;
        self.index.delete(id).await.map_err(|e| {
            tracing::warn!(id, error = %e, "InstanceInfo deleted from record store but not from search index");
            e
        })?;

        tracing::info!(id, "InstanceInfo deleted");
        Ok(())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<InstanceInfo>> {
        self.index.search(query).await
    }

    async fn reindex(&self) -> AppResult<u64> {
        self.index.delete_all().await?;

        let sort = Some(Sort::asc(SortField::Id));
        let mut page = PageRequest::new(0, self.reindex_batch_size);
        let mut mirrored = 0u64;

        loop {
            let batch = self.records.find_page(sort, page).await?;
            if batch.items.is_empty() {
                break;
            }

            let count = batch.items.len() as u64;
            stream::iter(batch.items)
                .map(|item| async move { self.index.save(&item).await })
                .buffer_unordered(REINDEX_CONCURRENCY)
                .try_collect::<Vec<()>>()
                .await?;

            mirrored += count;
            tracing::info!(mirrored, total = batch.total, "Reindexed batch");

            if mirrored >= batch.total {
                break;
            }
            page.page += 1;
        }

        Ok(mirrored)
    }
}
