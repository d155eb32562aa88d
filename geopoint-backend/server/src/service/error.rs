use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use atlas_axum::json_error;
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fail to reach the public IP discovery service, error: {source}"))]
    LookupPublicIp { source: reqwest::Error },

    #[snafu(display("Public IP discovery service answered with status {status}"))]
    PublicIpStatus { status: StatusCode },

    #[snafu(display("Fail to read the public IP discovery response, error: {source}"))]
    ReadPublicIpResponse { source: reqwest::Error },

    #[snafu(display("Fail to look up location for `{ip}`, error: {source}"))]
    LookupLocation { ip: String, source: reqwest::Error },

    #[snafu(display("Geolocation provider answered with status {status} for `{ip}`"))]
    LocationProviderStatus { ip: String, status: StatusCode },

    #[snafu(display("Fail to parse the geolocation provider response, error: {source}"))]
    ParseLocationResponse { source: reqwest::Error },

    #[snafu(display("Fail to acquire database connection, error: {source}"))]
    AcquireConnection { source: sqlx::Error },

    #[snafu(display("Fail to insert location record, error: {source}"))]
    InsertLocation { source: sqlx::Error },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Provider-side errors and transport failures are indistinguishable
        // to the caller; the specific reason only reaches the server log.
        json_error! {
            reason: self,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Unable to fetch location"
        }
    }
}
