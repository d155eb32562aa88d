use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};

use crate::{
    entity::{LocationResponse, RequestMetadata},
    web::controller::Result,
    ServiceState,
};

/// Resolve the caller's approximate geographic location.
///
/// The client address is the first `X-Forwarded-For` entry when present,
/// falling back to the transport peer address. Loopback callers are
/// replaced with the server's public address before the provider lookup so
/// that requests made against a local instance still resolve. The resolved
/// record is persisted best-effort; a failed write never affects the
/// response.
#[utoipa::path(
    get,
    operation_id = "resolve_location",
    path = "/api/location",
    responses(
        (status = 200, description = "Best-effort geolocation for the caller", body = LocationResponse),
        (status = 500, description = "Public address discovery or the geolocation provider failed")
    ),
    tag = "Location"
)]
pub async fn resolve_location(
    State(state): State<ServiceState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<LocationResponse>> {
    let candidate = atlas_axum::get_request_ip(&headers, &peer);
    let metadata = RequestMetadata::from_headers(&headers);

    let record = state.location_service.resolve(candidate, metadata).await?;

    Ok(Json(LocationResponse::from(record)))
}
