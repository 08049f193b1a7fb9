//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::instance_info_handler::InstanceInfoRequest;
use domain::InstanceInfo;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::instance_info_handler::create_instance_info,
        crate::api::handlers::instance_info_handler::update_instance_info,
        crate::api::handlers::instance_info_handler::list_instance_infos,
        crate::api::handlers::instance_info_handler::get_instance_info,
        crate::api::handlers::instance_info_handler::delete_instance_info,
        crate::api::handlers::instance_info_handler::search_instance_infos,
    ),
    components(schemas(InstanceInfo, InstanceInfoRequest)),
    tags(
        (name = "InstanceInfos", description = "InstanceInfo management and search endpoints"),
    )
)]
pub struct ApiDoc;
