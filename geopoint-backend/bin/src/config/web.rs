use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "WebConfig::default_host")]
    pub host: IpAddr,

    #[serde(default = "WebConfig::default_port")]
    pub port: u16,

    /// Directory served for requests that match no API route.
    #[serde(default = "WebConfig::default_static_dir")]
    pub static_dir: Option<PathBuf>,
}

impl WebConfig {
    #[inline]
    pub const fn socket_address(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }

    #[inline]
    pub const fn default_host() -> IpAddr { geopoint_backend_core::DEFAULT_WEB_HOST }

    /// `PORT` from the environment wins over the built-in default.
    #[inline]
    pub fn default_port() -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(geopoint_backend_core::DEFAULT_WEB_PORT)
    }

    #[inline]
    pub fn default_static_dir() -> Option<PathBuf> { Some(PathBuf::from("public")) }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            static_dir: Self::default_static_dir(),
        }
    }
}

impl From<WebConfig> for geopoint_backend_core::config::WebConfig {
    fn from(config: WebConfig) -> Self {
        Self { listen_address: config.socket_address(), static_dir: config.static_dir }
    }
}
