use geopoint_backend_core::config::GeolocationConfig;
use snafu::ResultExt;

use super::error::{self, Result};
use crate::entity::ProviderLocation;

/// Client for the external geolocation provider and the public address
/// discovery service.
#[derive(Clone)]
pub struct GeolocationClient {
    http: reqwest::Client,
    provider_url: String,
    public_ip_url: String,
    token: Option<String>,
}

impl GeolocationClient {
    /// Build the shared HTTP client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &GeolocationConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            provider_url: config.provider_url.trim_end_matches('/').to_string(),
            public_ip_url: config.public_ip_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Resolve geolocation data for `ip` from the provider.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider is unreachable, answers with a
    /// non-success status, or returns a body that does not parse.
    pub async fn lookup(&self, ip: &str) -> Result<ProviderLocation> {
        let url = format!("{}/{ip}/json", self.provider_url);

        let mut request = self.http.get(&url);
        if let Some(ref token) = self.token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await.context(error::LookupLocationSnafu { ip })?;

        let status = response.status();
        if !status.is_success() {
            return error::LocationProviderStatusSnafu { ip, status }.fail();
        }

        response.json::<ProviderLocation>().await.context(error::ParseLocationResponseSnafu)
    }

    /// Ask the discovery service for our public address.
    ///
    /// Only used when the caller reached us over a loopback address, where
    /// the peer address carries no usable location information.
    ///
    /// # Errors
    ///
    /// Returns an error when the discovery service is unreachable or answers
    /// with a non-success status.
    pub async fn public_ip(&self) -> Result<String> {
        let response =
            self.http.get(&self.public_ip_url).send().await.context(error::LookupPublicIpSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return error::PublicIpStatusSnafu { status }.fail();
        }

        let body = response.text().await.context(error::ReadPublicIpResponseSnafu)?;

        Ok(body.trim().to_string())
    }
}
