use std::{future::Future, net::SocketAddr};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use prometheus::{Encoder, TextEncoder};
use snafu::ResultExt;
use tokio::net::TcpListener;

use crate::{error, error::Error, Metrics};

/// Serve the Prometheus exposition endpoint until `shutdown_signal`
/// resolves.
///
/// # Errors
///
/// Returns an error when the listener cannot be bound or the server fails
/// while running.
pub async fn start_metrics_server<M, ShutdownSignal>(
    listen_address: SocketAddr,
    metrics: M,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    M: Metrics,
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router =
        Router::new().route("/metrics", routing::get(render_metrics::<M>)).with_state(metrics);

    let listener =
        TcpListener::bind(&listen_address).await.context(error::BindTcpServerSnafu)?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeMetricsServer { message: err.to_string() })
}

async fn render_metrics<M>(State(metrics): State<M>) -> Response
where
    M: Metrics,
{
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metrics.gather(), &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response()
}
