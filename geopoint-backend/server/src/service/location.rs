use snafu::ResultExt;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    error::{self, Result},
    geolocation::GeolocationClient,
    sql_executor::LocationSqlExecutor,
};
use crate::entity::{LocationRecord, RequestMetadata};

/// Resolves a candidate client address to a stored [`LocationRecord`].
#[derive(Clone)]
pub struct LocationService {
    db: Option<PgPool>,
    geolocation: GeolocationClient,
}

impl LocationService {
    #[inline]
    #[must_use]
    pub const fn new(db: Option<PgPool>, geolocation: GeolocationClient) -> Self {
        Self { db, geolocation }
    }

    /// Resolve `candidate_ip` to a location record.
    ///
    /// The candidate is normalized first; a loopback caller is replaced with
    /// the address the public discovery service reports, so lookups made
    /// from the machine the server runs on still return something useful.
    /// The record is persisted best-effort: a failed write is logged and the
    /// resolved record is returned regardless.
    ///
    /// # Errors
    ///
    /// Returns an error when public address discovery or the provider
    /// lookup fails.
    pub async fn resolve(
        &self,
        candidate_ip: String,
        metadata: RequestMetadata,
    ) -> Result<LocationRecord> {
        let ip = atlas_axum::strip_ipv4_mapped(&candidate_ip);

        let ip = if atlas_axum::is_loopback(&ip) {
            let public_ip = self.geolocation.public_ip().await?;
            tracing::debug!("Replaced loopback peer address with public address {public_ip}");
            public_ip
        } else {
            ip
        };

        let provider = self.geolocation.lookup(&ip).await?;

        let record = LocationRecord::new(ip, provider, metadata);

        // A failed write must not cost the caller their response.
        match self.store(&record).await {
            Ok(Some(id)) => tracing::debug!("Stored location record {id}"),
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "Failed to persist location record"),
        }

        Ok(record)
    }

    async fn store(&self, record: &LocationRecord) -> Result<Option<Uuid>> {
        let Some(ref db) = self.db else { return Ok(None) };

        let mut conn = db.acquire().await.context(error::AcquireConnectionSnafu)?;

        let id = conn.insert_location(record).await?;

        Ok(Some(id))
    }
}
