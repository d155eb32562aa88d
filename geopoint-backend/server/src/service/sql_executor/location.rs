use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    entity::LocationRecord,
    service::error::{self, Result},
};

#[async_trait]
pub trait LocationSqlExecutor {
    async fn insert_location(&mut self, record: &LocationRecord) -> Result<Uuid>;
}

#[async_trait]
impl<E> LocationSqlExecutor for E
where
    for<'c> &'c mut E: Executor<'c, Database = Postgres>,
{
    async fn insert_location(&mut self, record: &LocationRecord) -> Result<Uuid> {
        // Statements are bound at runtime so the crate builds without a
        // reachable database.
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO locations \
             (ip, city, region, country, latitude, longitude, org, postal, timezone, \
              user_agent, referer, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING id",
        )
        .bind(&record.ip)
        .bind(&record.city)
        .bind(&record.region)
        .bind(&record.country)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.org)
        .bind(&record.postal)
        .bind(&record.timezone)
        .bind(&record.user_agent)
        .bind(&record.referer)
        .bind(record.recorded_at)
        .fetch_one(&mut *self)
        .await
        .context(error::InsertLocationSnafu)?;

        Ok(id)
    }
}
