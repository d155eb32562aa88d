mod error;
mod location;

use axum::{routing, Extension, Json, Router};
use geopoint_backend_core::ServerInfo;
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::ServiceState;

pub fn api_router(service_state: &ServiceState) -> Router {
    Router::new()
        .route("/api/info", routing::get(server_info))
        .route("/api/location", routing::get(location::resolve_location))
        .with_state(service_state.clone())
}

/// Get server info
#[utoipa::path(
    get,
    operation_id = "get_server_info",
    path = "/api/info",
    responses(
        (status = 200, body = ServerInfo)
    )
)]
// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
pub async fn server_info(Extension(server_info): Extension<ServerInfo>) -> Json<ServerInfo> {
    Json(server_info)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        server_info,
        location::resolve_location,
    ),
    components(schemas(
        ServerInfo,
        crate::entity::LocationResponse,
    )),
    tags(
        (name = "Location", description = "Caller geolocation endpoints")
    )
)]
pub struct ApiDoc;
