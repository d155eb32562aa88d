use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GeolocationConfig {
    /// Base URL of the geolocation provider.
    #[serde(default = "GeolocationConfig::default_provider_url")]
    pub provider_url: String,

    /// Service answering "what is my public address" for loopback callers.
    #[serde(default = "GeolocationConfig::default_public_ip_url")]
    pub public_ip_url: String,

    /// Provider API token, attached as a query parameter when set.
    #[serde(default = "GeolocationConfig::default_token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Timeout in seconds applied to both outbound calls.
    #[serde(default = "GeolocationConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl GeolocationConfig {
    #[inline]
    pub fn default_provider_url() -> String { "https://ipinfo.io".to_string() }

    #[inline]
    pub fn default_public_ip_url() -> String { "https://api.ipify.org".to_string() }

    /// `IPINFO_TOKEN` from the environment wins over the built-in default.
    #[inline]
    pub fn default_token() -> Option<String> { std::env::var("IPINFO_TOKEN").ok() }

    #[inline]
    pub const fn default_request_timeout_secs() -> u64 { 10 }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider_url: Self::default_provider_url(),
            public_ip_url: Self::default_public_ip_url(),
            token: Self::default_token(),
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

impl From<GeolocationConfig> for geopoint_backend_core::config::GeolocationConfig {
    fn from(
        GeolocationConfig {
            provider_url,
            public_ip_url,
            token,
            request_timeout_secs,
        }: GeolocationConfig,
    ) -> Self {
        Self {
            provider_url,
            public_ip_url,
            token,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}
