pub mod entity;
mod error;
mod service;
mod web;

use std::net::SocketAddr;

use atlas_metrics::DefaultMetrics;
use futures::{future::BoxFuture, FutureExt};
use geopoint_backend_core::{
    config::{Config, GeolocationConfig, PostgresConfig, WebConfig},
    ServerInfo,
};
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::Instrument;

pub use self::{
    error::{Error, Result},
    service::GeolocationClient,
    web::{controller, ApiDoc, ServiceState},
};

const MIGRATOR: Migrator = Migrator { ignore_missing: true, ..sqlx::migrate!() };

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { postgres, web, geolocation, metrics } = config;

    let database = if postgres.enable {
        Some(initialize_postgres_pool(&postgres).await?)
    } else {
        tracing::warn!("Persistence is disabled, location records will not be stored");
        None
    };

    let geolocation_client = initialize_geolocation_client(&geolocation)?;

    let service_state = ServiceState::new(database, geolocation_client);

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web, service_state, server_info),
    );

    if metrics.enable {
        let default_metrics = DefaultMetrics::new()?;

        let _handle = lifecycle_manager.spawn(
            "Metrics server",
            create_metrics_server_future(metrics.listen_address, default_metrics),
        );
    }

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

#[tracing::instrument(skip_all, fields(max_connections = max_connections))]
async fn initialize_postgres_pool(
    PostgresConfig { url, max_connections, application_name, .. }: &PostgresConfig,
) -> Result<PgPool> {
    tracing::info!("Initializing database");

    let connect_opts = url.parse::<PgConnectOptions>().context(error::ParsePostgresUrlSnafu)?;

    // append application name if provided
    let connect_opts = if let Some(app_name) = application_name {
        connect_opts.application_name(app_name)
    } else {
        connect_opts
    };

    let pool = PgPoolOptions::new()
        .max_connections(*max_connections)
        .connect_with(connect_opts)
        .await
        .context(error::InitializePostgresPoolSnafu)?;

    MIGRATOR
        .run(&pool)
        .instrument(tracing::info_span!("migrate"))
        .await
        .context(error::MigrateSchemaSnafu)?;

    Ok(pool)
}

#[tracing::instrument(
    skip(config),
    fields(
        provider_url = %config.provider_url,
        public_ip_url = %config.public_ip_url
    )
)]
fn initialize_geolocation_client(config: &GeolocationConfig) -> Result<GeolocationClient> {
    tracing::info!("Initializing geolocation client");

    GeolocationClient::new(config).map_err(|err| Error::InitializeGeolocationClient {
        message: format!("Failed to build HTTP client: {err}"),
    })
}

fn create_web_http_server_future(
    config: WebConfig,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen Web HTTP server endpoint on {}", config.listen_address);

            let result =
                web::new_api_server(config, service_state, server_info, shutdown_signal).await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}

fn create_metrics_server_future<Metrics>(
    listen_address: SocketAddr,
    metrics: Metrics,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>>
where
    Metrics: atlas_metrics::Metrics + 'static,
{
    move |signal| {
        async move {
            tracing::info!("Listen metrics endpoint on {listen_address}");

            let result = atlas_metrics::start_metrics_server(listen_address, metrics, signal).await;

            match result {
                Ok(()) => {
                    tracing::info!("Metrics server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
