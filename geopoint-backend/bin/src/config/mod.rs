mod error;
mod geolocation;
mod metrics;
mod postgres;
mod web;

use std::path::{Path, PathBuf};

use atlas_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error, geolocation::GeolocationConfig, metrics::MetricsConfig,
    postgres::PostgresConfig, web::WebConfig,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub postgres: PostgresConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            web: WebConfig::default(),
            postgres: PostgresConfig::default(),
            geolocation: GeolocationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            geopoint_backend_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(geopoint_backend_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }
}

#[inline]
#[must_use]
pub fn load_server_config(
    Config { web, postgres, geolocation, metrics, .. }: Config,
) -> geopoint_backend_core::config::Config {
    geopoint_backend_core::config::Config {
        web: web.into(),
        postgres: postgres.into(),
        geolocation: geolocation.into(),
        metrics: metrics.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();

        let text = serde_yaml::to_string(&config).expect("`Config` is serializable");
        let parsed: Config = serde_yaml::from_str(&text).expect("default config parses back");

        assert_eq!(parsed.web.port, config.web.port);
        assert_eq!(parsed.web.host, config.web.host);
        assert_eq!(parsed.postgres.url, config.postgres.url);
        assert_eq!(parsed.postgres.enable, config.postgres.enable);
        assert_eq!(parsed.geolocation.provider_url, config.geolocation.provider_url);
        assert_eq!(parsed.metrics.enable, config.metrics.enable);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let parsed: Config = serde_yaml::from_str("{}").expect("empty mapping parses");

        assert_eq!(parsed.web.port, Config::default().web.port);
        assert_eq!(parsed.postgres.max_connections, Config::default().postgres.max_connections);
    }
}
