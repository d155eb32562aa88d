pub mod controller;
pub mod error;

use std::{future::Future, net::SocketAddr};

use atlas_axum::response::JsonError;
use axum::{
    extract::Request, http, response::IntoResponse, routing, Extension, Json, Router, ServiceExt,
};
use geopoint_backend_core::{config::WebConfig, ServerInfo};
use snafu::ResultExt;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer, normalize_path::NormalizePathLayer, services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub use self::{controller::ApiDoc, error::Error};
use crate::service::{GeolocationClient, LocationService};

pub async fn new_api_server<ShutdownSignal>(
    config: WebConfig,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let WebConfig { listen_address, static_dir } = config;

    let middleware_stack =
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CompressionLayer::new());

    let router = {
        let router = Router::new()
            .route(
                "/openapi.json",
                routing::get(openapi_json),
            )
            .merge(controller::api_router(&service_state));
        // Unmatched requests serve the public asset directory when one is
        // configured, which also puts its index page on `/`.
        let router = match static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            // For load balancer default health check
            None => router.route("/", routing::get(controller::server_info)).fallback(fallback),
        };
        let router = router.layer(Extension(server_info)).layer(middleware_stack);
        let router = NormalizePathLayer::trim_trailing_slash().layer(router);
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(router)
    };

    let listener = TcpListener::bind(&listen_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    JsonError::new(http::StatusCode::NOT_FOUND, format!("No route for {uri}")).into_response()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> { Json(ApiDoc::openapi()) }

#[derive(Clone)]
pub struct ServiceState {
    pub location_service: LocationService,
}

impl ServiceState {
    /// Create a new service state
    #[must_use]
    pub fn new(database: Option<PgPool>, geolocation_client: GeolocationClient) -> Self {
        let location_service = LocationService::new(database, geolocation_client);

        Self { location_service }
    }
}
