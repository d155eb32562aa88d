use std::{net::SocketAddr, path::PathBuf, time::Duration};

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub postgres: PostgresConfig,

    pub geolocation: GeolocationConfig,

    pub metrics: MetricsConfig,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,

    /// Directory served for requests that match no API route.
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub enable: bool,

    pub url: String,

    pub max_connections: u32,

    pub application_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GeolocationConfig {
    /// Base URL of the geolocation provider.
    pub provider_url: String,

    /// Service answering "what is my public address" for loopback callers.
    pub public_ip_url: String,

    pub token: Option<String>,

    /// Timeout applied to both outbound calls.
    pub request_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enable: bool,

    pub listen_address: SocketAddr,
}
