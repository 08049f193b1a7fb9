//! InstanceInfo handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::InstanceInfo;

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;
use crate::types::{PageRequest, Sort, DEFAULT_PAGE_SIZE};

/// Header carrying the unpaged row count of a listing
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// InstanceInfo create/update payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfoRequest {
    /// Must be absent on create and present on update
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[validate(
        required(message = "instanceInfoName is required"),
        length(min = 1, message = "instanceInfoName must not be empty")
    )]
    #[schema(example = "AAAAAAAAAA")]
    pub instance_info_name: Option<String>,
    #[schema(example = "AAAAAAAAAA")]
    pub description: Option<String>,
}

impl From<InstanceInfoRequest> for InstanceInfo {
    fn from(req: InstanceInfoRequest) -> Self {
        Self {
            id: req.id,
            instance_info_name: req.instance_info_name.unwrap_or_default(),
            description: req.description,
        }
    }
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// `field,direction`, e.g. `id,desc`
    pub sort: Option<String>,
    /// Zero-based page index
    pub page: Option<u64>,
    /// Items per page (default 20, max 100)
    pub size: Option<u64>,
}

impl ListParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// `field:value` query, e.g. `id:42`
    #[serde(default)]
    pub query: String,
}

/// Create instance-info routes
pub fn instance_info_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/instance-infos",
            get(list_instance_infos)
                .post(create_instance_info)
                .put(update_instance_info),
        )
        .route(
            "/instance-infos/:id",
            get(get_instance_info).delete(delete_instance_info),
        )
        .route("/_search/instance-infos", get(search_instance_infos))
}

fn created(instance_info: InstanceInfo) -> Response {
    let location = instance_info
        .id
        .map(|id| format!("/api/instance-infos/{}", id))
        .unwrap_or_default();

    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(instance_info),
    )
        .into_response()
}

/// Create a new instanceInfo
#[utoipa::path(
    post,
    path = "/api/instance-infos",
    tag = "InstanceInfos",
    request_body = InstanceInfoRequest,
    responses(
        (status = 201, description = "InstanceInfo created", body = InstanceInfo),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Payload already has an id, or a store failed")
    )
)]
pub async fn create_instance_info(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InstanceInfoRequest>,
) -> AppResult<Response> {
    let saved = state.instance_infos.create(payload.into()).await?;
    Ok(created(saved))
}

/// Update an existing instanceInfo (a payload without id is created instead)
#[utoipa::path(
    put,
    path = "/api/instance-infos",
    tag = "InstanceInfos",
    request_body = InstanceInfoRequest,
    responses(
        (status = 200, description = "InstanceInfo updated", body = InstanceInfo),
        (status = 201, description = "InstanceInfo created", body = InstanceInfo),
        (status = 400, description = "Validation error"),
        (status = 404, description = "InstanceInfo not found")
    )
)]
pub async fn update_instance_info(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<InstanceInfoRequest>,
) -> AppResult<Response> {
    let is_new = payload.id.is_none();
    let saved = state.instance_infos.update(payload.into()).await?;

    if is_new {
        return Ok(created(saved));
    }
    Ok(Json(saved).into_response())
}

/// List instanceInfos from the record store
#[utoipa::path(
    get,
    path = "/api/instance-infos",
    tag = "InstanceInfos",
    params(ListParams),
    responses(
        (status = 200, description = "One page of instanceInfos", body = Vec<InstanceInfo>,
            headers(("X-Total-Count" = u64, description = "Total number of instanceInfos"))),
        (status = 400, description = "Invalid sort parameter or page out of range")
    )
)]
pub async fn list_instance_infos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let sort = params.sort.as_deref().map(str::parse::<Sort>).transpose()?;
    let page = state
        .instance_infos
        .list(sort, params.page_request())
        .await?;

    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(page.items),
    )
        .into_response())
}

/// Get an instanceInfo by id
#[utoipa::path(
    get,
    path = "/api/instance-infos/{id}",
    tag = "InstanceInfos",
    params(
        ("id" = i64, Path, description = "InstanceInfo ID")
    ),
    responses(
        (status = 200, description = "InstanceInfo", body = InstanceInfo),
        (status = 404, description = "InstanceInfo not found")
    )
)]
pub async fn get_instance_info(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InstanceInfo>> {
    let instance_info = state.instance_infos.get(id).await?;
    Ok(Json(instance_info))
}

/// Delete an instanceInfo from both stores
#[utoipa::path(
    delete,
    path = "/api/instance-infos/{id}",
    tag = "InstanceInfos",
    params(
        ("id" = i64, Path, description = "InstanceInfo ID")
    ),
    responses(
        (status = 200, description = "InstanceInfo deleted (or already absent)")
    )
)]
pub async fn delete_instance_info(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.instance_infos.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Search instanceInfos through the search index
#[utoipa::path(
    get,
    path = "/api/_search/instance-infos",
    tag = "InstanceInfos",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching instanceInfos", body = Vec<InstanceInfo>),
        (status = 400, description = "Malformed query")
    )
)]
pub async fn search_instance_infos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<InstanceInfo>>> {
    let hits = state.instance_infos.search(&params.query).await?;
    Ok(Json(hits))
}
