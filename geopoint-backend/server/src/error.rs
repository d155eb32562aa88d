use snafu::Snafu;

use crate::web;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Can not parse Postgres connection URL, error: {source}"))]
    ParsePostgresUrl { source: sqlx::error::Error },

    #[snafu(display("Can not initialize Postgres pool, error: {source}"))]
    InitializePostgresPool { source: sqlx::error::Error },

    #[snafu(display("Fail to migrate postgres schema, error: {source}",))]
    MigrateSchema { source: sqlx::migrate::MigrateError },

    #[snafu(display("Failed to initialize geolocation client: {message}"))]
    InitializeGeolocationClient { message: String },

    #[snafu(display("{source}"))]
    Metrics { source: atlas_metrics::Error },

    #[snafu(display("{source}"))]
    Web { source: web::Error },
}

impl From<atlas_metrics::Error> for Error {
    fn from(source: atlas_metrics::Error) -> Self { Self::Metrics { source } }
}

impl From<web::Error> for Error {
    fn from(source: web::Error) -> Self { Self::Web { source } }
}
