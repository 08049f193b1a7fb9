//! Record store for InstanceInfo rows.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, Order, PaginatorTrait,
    QueryOrder, QuerySelect, Select, Set, Unchanged,
};

use super::entities::instance_info::{ActiveModel, Column, Entity as InstanceInfoEntity};
use crate::types::{Page, PageRequest, Sort, SortDirection, SortField};
use common::{AppError, AppResult};
use domain::InstanceInfo;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Record store contract.
///
/// Absent ids are never an error here: lookups return `None` and deletes are
/// no-ops. The caller decides what "not found" means.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InstanceInfoRepository: Send + Sync {
    /// List all rows in the requested order (unspecified when `sort` is `None`)
    async fn find_all(&self, sort: Option<Sort>) -> AppResult<Vec<InstanceInfo>>;

    /// List one page of rows plus the total row count
    async fn find_page(&self, sort: Option<Sort>, page: PageRequest) -> AppResult<Page<InstanceInfo>>;

    /// Find a row by ID
    async fn find_one(&self, id: i64) -> AppResult<Option<InstanceInfo>>;

    /// Insert when `id` is unset (assigning one), otherwise overwrite every field
    async fn save(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo>;

    /// Delete a row by ID
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Check whether a row exists
    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Count all rows
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of InstanceInfoRepository
pub struct InstanceInfoStore {
    db: DatabaseConnection,
}

impl InstanceInfoStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn ordered(sort: Option<Sort>) -> Select<InstanceInfoEntity> {
        let query = InstanceInfoEntity::find();
        let Some(sort) = sort else {
            return query;
        };

        let column = match sort.field {
            SortField::Id => Column::Id,
            SortField::InstanceInfoName => Column::InstanceInfoName,
            SortField::Description => Column::Description,
        };
        let order = match sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        query.order_by(column, order)
    }
}

#[async_trait]
impl InstanceInfoRepository for InstanceInfoStore {
    async fn find_all(&self, sort: Option<Sort>) -> AppResult<Vec<InstanceInfo>> {
        let models = Self::ordered(sort)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(InstanceInfo::from).collect())
    }

    async fn find_page(&self, sort: Option<Sort>, page: PageRequest) -> AppResult<Page<InstanceInfo>> {
        let offset = page.offset().ok_or_else(|| {
            AppError::bad_request(format!("page {} is out of range", page.page))
        })?;

        let query = Self::ordered(sort);
        let total = query.clone().count(&self.db).await?;
        let models = query
            .offset(offset)
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(Page::new(
            models.into_iter().map(InstanceInfo::from).collect(),
            total,
        ))
    }

    async fn find_one(&self, id: i64) -> AppResult<Option<InstanceInfo>> {
        let result = InstanceInfoEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(InstanceInfo::from))
    }

    async fn save(&self, instance_info: InstanceInfo) -> AppResult<InstanceInfo> {
        let active_model = ActiveModel {
            id: match instance_info.id {
                Some(id) => Unchanged(id),
                None => NotSet,
            },
            instance_info_name: Set(instance_info.instance_info_name),
            description: Set(instance_info.description),
        };

        let model = if instance_info.id.is_some() {
            active_model.update(&self.db).await.map_err(|e| match e {
                DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AppError::NotFound,
                other => AppError::from(other),
            })?
        } else {
            active_model.insert(&self.db).await.map_err(AppError::from)?
        };

        tracing::debug!(id = model.id, "InstanceInfo saved to record store");
        Ok(InstanceInfo::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = InstanceInfoEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::debug!(id, rows = result.rows_affected, "InstanceInfo deleted from record store");
        Ok(())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.find_one(id).await?.is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        InstanceInfoEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Database;
    use common::DatabaseConfig;

    async fn store() -> InstanceInfoStore {
        let db = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        InstanceInfoStore::new(db.get_connection())
    }

    #[tokio::test]
    async fn save_assigns_id_on_insert() {
        let store = store().await;

        let saved = store
            .save(InstanceInfo::new("AAAAA", Some("AAAAA".to_string())))
            .await
            .unwrap();

        let id = saved.id.expect("id assigned");
        assert_eq!(store.find_one(id).await.unwrap(), Some(saved));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_overwrites_all_fields_of_existing_row() {
        let store = store().await;
        let saved = store
            .save(InstanceInfo::new("AAAAA", Some("AAAAA".to_string())))
            .await
            .unwrap();
        let id = saved.id.unwrap();

        let updated = store
            .save(InstanceInfo::new("BBBBB", None).with_id(id))
            .await
            .unwrap();

        assert_eq!(updated, InstanceInfo::new("BBBBB", None).with_id(id));
        assert_eq!(store.find_one(id).await.unwrap(), Some(updated));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let store = store().await;

        let result = store.save(InstanceInfo::new("AAAAA", None).with_id(404)).await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_and_find_tolerate_missing_rows() {
        let store = store().await;

        assert_eq!(store.find_one(i64::MAX).await.unwrap(), None);
        assert!(!store.exists(i64::MAX).await.unwrap());
        store.delete(i64::MAX).await.unwrap();
    }

    #[tokio::test]
    async fn find_all_honors_requested_order() {
        let store = store().await;
        for name in ["b", "c", "a"] {
            store.save(InstanceInfo::new(name, None)).await.unwrap();
        }

        let by_id_desc = store.find_all(Some(Sort::desc(SortField::Id))).await.unwrap();
        let ids: Vec<i64> = by_id_desc.iter().filter_map(|i| i.id).collect();
        let mut expected = ids.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, expected);

        let by_name = store
            .find_all(Some(Sort::asc(SortField::InstanceInfoName)))
            .await
            .unwrap();
        let names: Vec<&str> = by_name.iter().map(|i| i.instance_info_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn find_page_reports_total() {
        let store = store().await;
        for i in 0..5 {
            store.save(InstanceInfo::new(format!("name-{}", i), None)).await.unwrap();
        }

        let page = store
            .find_page(Some(Sort::asc(SortField::Id)), PageRequest::new(1, 2))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].instance_info_name, "name-2");
    }

    #[tokio::test]
    async fn find_page_rejects_overflowing_page_index() {
        let store = store().await;
        store.save(InstanceInfo::new("AAAAA", None)).await.unwrap();

        let result = store
            .find_page(Some(Sort::asc(SortField::Id)), PageRequest::new(u64::MAX, 2))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn find_page_past_the_end_is_empty() {
        let store = store().await;
        store.save(InstanceInfo::new("AAAAA", None)).await.unwrap();

        let page = store
            .find_page(None, PageRequest::new(1_000, 20))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }
}
