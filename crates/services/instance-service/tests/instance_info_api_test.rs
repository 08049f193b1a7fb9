//! Router-level tests for the InstanceInfo endpoints.
//!
//! Each test runs the real router over an in-memory SQLite record store and
//! the in-process search index, so both halves of every write can be checked.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::DatabaseConfig;
use domain::InstanceInfo;
use instance_service_lib::api::{create_router, AppState};
use instance_service_lib::infra::Database;
use instance_service_lib::repository::{InstanceInfoRepository, InstanceInfoStore};
use instance_service_lib::search::{InMemorySearchIndex, InstanceInfoSearchIndex};
use instance_service_lib::service::InstanceInfoManager;

const DEFAULT_NAME: &str = "AAAAAAAAAA";
const UPDATED_NAME: &str = "BBBBBBBBBB";

// =============================================================================
// Test Harness
// =============================================================================

struct TestApp {
    router: Router,
    records: Arc<InstanceInfoStore>,
    index: Arc<InMemorySearchIndex>,
}

async fn spawn_app() -> TestApp {
    let database = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    let records = Arc::new(InstanceInfoStore::new(database.get_connection()));
    let index = Arc::new(InMemorySearchIndex::new());

    let service = Arc::new(InstanceInfoManager::new(records.clone(), index.clone()));
    let state = AppState::new(service, database, index.clone());

    TestApp {
        router: create_router(state),
        records,
        index,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, body)
    }

    async fn post(&self, body: Value) -> (StatusCode, axum::http::HeaderMap, Value) {
        self.send(json_request("POST", "/api/instance-infos", body)).await
    }

    async fn put(&self, body: Value) -> (StatusCode, axum::http::HeaderMap, Value) {
        self.send(json_request("PUT", "/api/instance-infos", body)).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        self.send(empty_request("GET", uri)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        self.send(empty_request("DELETE", uri)).await
    }

    async fn create(&self, name: &str) -> i64 {
        let (status, _, body) = self
            .post(json!({ "instanceInfoName": name, "description": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().expect("assigned id")
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_persists_and_mirrors() {
    let app = spawn_app().await;

    let (status, headers, body) = app
        .post(json!({ "instanceInfoName": DEFAULT_NAME, "description": DEFAULT_NAME }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["instanceInfoName"], DEFAULT_NAME);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        format!("/api/instance-infos/{}", id).as_str()
    );

    let expected =
        InstanceInfo::new(DEFAULT_NAME, Some(DEFAULT_NAME.to_string())).with_id(id);
    assert_eq!(app.records.find_one(id).await.unwrap(), Some(expected.clone()));
    assert_eq!(app.index.find_one(id).await.unwrap(), Some(expected));
    assert_eq!(app.records.count().await.unwrap(), 1);
}

#[tokio::test]
async fn create_without_name_is_rejected() {
    let app = spawn_app().await;

    let (status, _, body) = app.post(json!({ "description": DEFAULT_NAME })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _, _) = app.post(json!({ "instanceInfoName": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.records.count().await.unwrap(), 0);
    assert!(app.index.is_empty().await);
}

#[tokio::test]
async fn create_with_malformed_body_is_rejected() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/instance-infos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_with_existing_id_fails_without_writes() {
    let app = spawn_app().await;

    let (status, _, body) = app
        .post(json!({ "id": 1, "instanceInfoName": DEFAULT_NAME }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(app.records.count().await.unwrap(), 0);
    assert!(app.index.is_empty().await);
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn get_returns_record_or_404() {
    let app = spawn_app().await;
    let id = app.create(DEFAULT_NAME).await;

    let (status, _, body) = app.get(&format!("/api/instance-infos/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["description"], DEFAULT_NAME);

    let (status, _, body) = app.get("/api/instance-infos/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_sorts_pages_and_counts() {
    let app = spawn_app().await;
    let first = app.create("AAAAA").await;
    let second = app.create("CCCCC").await;
    let third = app.create("BBBBB").await;

    let (status, headers, body) = app.get("/api/instance-infos?sort=id,desc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("X-Total-Count").unwrap(), "3");
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);

    let (_, headers, body) = app
        .get("/api/instance-infos?sort=instanceInfoName,asc&page=1&size=2")
        .await;
    assert_eq!(headers.get("X-Total-Count").unwrap(), "3");
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["instanceInfoName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["CCCCC"]);
}

#[tokio::test]
async fn list_rejects_page_index_past_sql_offset_range() {
    let app = spawn_app().await;
    app.create(DEFAULT_NAME).await;

    let (status, _, body) = app
        .get("/api/instance-infos?sort=id,asc&page=18446744073709551615&size=2")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _, _) = app
        .get("/api/instance-infos?page=9223372036854775807&size=100")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_past_the_last_page_is_empty() {
    let app = spawn_app().await;
    app.create(DEFAULT_NAME).await;

    let (status, headers, body) = app.get("/api/instance-infos?page=50&size=20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("X-Total-Count").unwrap(), "1");
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_rejects_unknown_sort_field() {
    let app = spawn_app().await;

    let (status, _, body) = app.get("/api/instance-infos?sort=createdAt,asc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_overwrites_both_stores() {
    let app = spawn_app().await;
    let id = app.create(DEFAULT_NAME).await;

    let (status, _, body) = app
        .put(json!({ "id": id, "instanceInfoName": UPDATED_NAME, "description": UPDATED_NAME }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["instanceInfoName"], UPDATED_NAME);

    let expected =
        InstanceInfo::new(UPDATED_NAME, Some(UPDATED_NAME.to_string())).with_id(id);
    assert_eq!(app.records.find_one(id).await.unwrap(), Some(expected.clone()));
    assert_eq!(app.index.find_one(id).await.unwrap(), Some(expected));
    assert_eq!(app.records.count().await.unwrap(), 1);
    assert_eq!(app.index.len().await, 1);
}

#[tokio::test]
async fn update_of_unknown_id_is_404_without_writes() {
    let app = spawn_app().await;

    let (status, _, _) = app
        .put(json!({ "id": 4242, "instanceInfoName": UPDATED_NAME }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.records.count().await.unwrap(), 0);
    assert!(app.index.is_empty().await);
}

#[tokio::test]
async fn update_without_id_creates() {
    let app = spawn_app().await;

    let (status, _, body) = app.put(json!({ "instanceInfoName": DEFAULT_NAME })).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert!(app.records.exists(id).await.unwrap());
    assert!(app.index.exists(id).await.unwrap());
}

#[tokio::test]
async fn update_with_empty_name_is_rejected() {
    let app = spawn_app().await;
    let id = app.create(DEFAULT_NAME).await;

    let (status, _, _) = app.put(json!({ "id": id, "instanceInfoName": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.index.find_one(id).await.unwrap().unwrap().instance_info_name,
        DEFAULT_NAME
    );
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_removes_from_both_stores_and_is_idempotent() {
    let app = spawn_app().await;
    let id = app.create(DEFAULT_NAME).await;
    let uri = format!("/api/instance-infos/{}", id);

    let (status, _, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.records.exists(id).await.unwrap());
    assert!(!app.index.exists(id).await.unwrap());

    let (status, _, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn search_by_id_returns_exactly_that_instance() {
    let app = spawn_app().await;
    app.create("AAAAA").await;
    let id = app.create("CCCCC").await;

    let (status, _, body) = app
        .get(&format!("/api/_search/instance-infos?query=id:{}", id))
        .await;

    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], id);
    assert_eq!(hits[0]["instanceInfoName"], "CCCCC");
}

#[tokio::test]
async fn search_reads_only_the_index() {
    let app = spawn_app().await;
    let id = app.create(DEFAULT_NAME).await;

    // Drop the mirror behind the service's back; the row is still in the record store.
    app.index.delete(id).await.unwrap();

    let (status, _, body) = app
        .get(&format!("/api/_search/instance-infos?query=id:{}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _, _) = app.get(&format!("/api/instance-infos/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_with_unknown_field_is_rejected() {
    let app = spawn_app().await;

    let (status, _, _) = app.get("/api/_search/instance-infos?query=owner:bob").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_with_non_numeric_id_is_rejected() {
    let app = spawn_app().await;
    app.create(DEFAULT_NAME).await;

    let (status, _, body) = app.get("/api/_search/instance-infos?query=id:abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn create_update_delete_round_trip() {
    let app = spawn_app().await;

    let (_, _, created) = app
        .post(json!({ "instanceInfoName": "AAAAA", "description": "AAAAA" }))
        .await;
    let id = created["id"].as_i64().unwrap();

    app.put(json!({ "id": id, "instanceInfoName": "BBBBB", "description": "BBBBB" }))
        .await;
    let (_, _, hits) = app
        .get(&format!("/api/_search/instance-infos?query=id:{}", id))
        .await;
    assert_eq!(hits[0]["instanceInfoName"], "BBBBB");

    app.delete(&format!("/api/instance-infos/{}", id)).await;
    let (_, _, hits) = app
        .get(&format!("/api/_search/instance-infos?query=id:{}", id))
        .await;
    assert_eq!(hits, json!([]));
    assert_eq!(app.records.count().await.unwrap(), 0);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_both_stores() {
    let app = spawn_app().await;

    let (status, _, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["search_index"]["status"], "healthy");
}
