//! Elasticsearch-backed search index.

use async_trait::async_trait;
use elasticsearch::{
    http::{
        response::Response,
        transport::{BuildError, SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    DeleteByQueryParts, DeleteParts, Elasticsearch, ExistsParts, GetParts, IndexParts,
    SearchParts,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use super::InstanceInfoSearchIndex;
use common::{AppError, AppResult, SearchConfig};
use domain::InstanceInfo;

/// Upper bound on hits returned by one search
const MAX_SEARCH_HITS: i64 = 1_000;

#[derive(Debug, Error)]
pub enum ElasticsearchError {
    #[error("invalid Elasticsearch URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build transport: {0}")]
    TransportBuild(#[from] BuildError),
    #[error("transport error: {0}")]
    Transport(#[from] elasticsearch::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<ElasticsearchError> for AppError {
    fn from(err: ElasticsearchError) -> Self {
        AppError::search_index(err.to_string())
    }
}

/// InstanceInfo documents in one Elasticsearch index, `_id` = record id.
#[derive(Clone)]
pub struct ElasticsearchIndex {
    client: Elasticsearch,
    index: String,
    refresh_on_write: bool,
}

impl ElasticsearchIndex {
    /// Connect and make sure the index exists with its mapping.
    pub async fn connect(config: &SearchConfig) -> Result<Self, ElasticsearchError> {
        let parsed = Url::parse(&config.url)?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool).build()?;
        let client = Elasticsearch::new(transport);

        let instance = Self {
            client,
            index: config.index.clone(),
            refresh_on_write: config.refresh_on_write,
        };

        instance.ensure_index().await?;

        Ok(instance)
    }

    async fn ensure_index(&self) -> Result<(), ElasticsearchError> {
        let exists_response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await?;

        if exists_response.status_code().is_success() {
            return Ok(());
        }

        let body = json!({
            "mappings": {
                "properties": {
                    "id": { "type": "long" },
                    "instanceInfoName": { "type": "text" },
                    "description": { "type": "text" }
                }
            }
        });

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(body)
            .send()
            .await?;
        expect_success(response).await?;

        tracing::info!(index = %self.index, "Created search index");
        Ok(())
    }

    fn refresh(&self) -> Refresh {
        if self.refresh_on_write {
            Refresh::WaitFor
        } else {
            Refresh::False
        }
    }
}

/// Turn a non-2xx response into an error carrying the response body.
async fn expect_success(response: Response) -> Result<Response, ElasticsearchError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ElasticsearchError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl InstanceInfoSearchIndex for ElasticsearchIndex {
    async fn find_one(&self, id: i64) -> AppResult<Option<InstanceInfo>> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index, &id.to_string()))
            .send()
            .await
            .map_err(ElasticsearchError::from)?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = expect_success(response).await?;
        let doc: GetResponse = response.json().await.map_err(ElasticsearchError::from)?;
        Ok(if doc.found { doc.source } else { None })
    }

    async fn save(&self, instance_info: &InstanceInfo) -> AppResult<()> {
        let id = instance_info.require_id()?;

        let response = self
            .client
            .index(IndexParts::IndexId(&self.index, &id.to_string()))
            .refresh(self.refresh())
            .body(instance_info)
            .send()
            .await
            .map_err(ElasticsearchError::from)?;
        expect_success(response).await?;

        tracing::debug!(id, index = %self.index, "InstanceInfo indexed");
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index, &id.to_string()))
            .refresh(self.refresh())
            .send()
            .await
            .map_err(ElasticsearchError::from)?;

        if response.status_code() != StatusCode::NOT_FOUND {
            expect_success(response).await?;
        }

        tracing::debug!(id, index = %self.index, "InstanceInfo removed from index");
        Ok(())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let response = self
            .client
            .exists(ExistsParts::IndexId(&self.index, &id.to_string()))
            .send()
            .await
            .map_err(ElasticsearchError::from)?;

        match response.status_code() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => {
                expect_success(response).await?;
                Ok(false)
            }
        }
    }

    async fn search(&self, query: &str) -> AppResult<Vec<InstanceInfo>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let body = json!({
            "size": MAX_SEARCH_HITS,
            "query": {
                "query_string": {
                    "query": query
                }
            }
        });

        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(ElasticsearchError::from)?;

        if response.status_code() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::validation(format!("invalid search query: {}", body)));
        }

        let response = expect_success(response).await?;
        let search_response: SearchResponse =
            response.json().await.map_err(ElasticsearchError::from)?;

        Ok(search_response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .collect())
    }

    async fn delete_all(&self) -> AppResult<()> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[self.index.as_str()]))
            .refresh(true)
            .body(json!({ "query": { "match_all": {} } }))
            .send()
            .await
            .map_err(ElasticsearchError::from)?;
        expect_success(response).await?;

        tracing::info!(index = %self.index, "Cleared search index");
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(ElasticsearchError::from)?;
        expect_success(response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<InstanceInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: InnerHits,
}

#[derive(Debug, Deserialize)]
struct InnerHits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Option<InstanceInfo>,
}
