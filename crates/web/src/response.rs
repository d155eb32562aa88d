use std::borrow::Cow;

use axum::{
    body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error payload rendered to clients as `{"error": "..."}`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: Cow<'static, str>,
}

/// A JSON error response with an attached status code.
#[derive(Clone, Debug)]
pub struct JsonError {
    status_code: StatusCode,
    body: ErrorBody,
}

impl JsonError {
    #[must_use]
    pub fn new(status_code: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status_code, body: ErrorBody { error: message.into() } }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode { self.status_code }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let body = body::Body::from(serde_json::to_vec(&self.body).expect("body is serializable"));

        Response::builder()
            .status(self.status_code)
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(body)
            .expect("Build `Axum` response successfully; qed")
    }
}

/// Build an error [`Response`], logging the reason server-side when one is
/// given. The reason never reaches the client; only `message` does.
#[macro_export]
macro_rules! json_error {
    (status: $status:expr,message: $message:expr) => {
        $crate::response::JsonError::new($status, $message).into_response()
    };

    (reason: $reason:expr,status: $status:expr,message: $message:expr) => {{
        if $status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(status_code = $status.as_u16(), "Internal Server Error: {:?}", $reason);
        } else {
            tracing::warn!(status_code = $status.as_u16(), "Response Error: {:?}", $reason);
        }

        json_error! { status: $status, message: $message }
    }};
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::response::JsonError;

    #[test]
    fn body_shape_is_a_single_error_field() {
        let response = JsonError::new(StatusCode::INTERNAL_SERVER_ERROR, "Unable to fetch location");

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = response.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).map(|value| value.as_bytes()),
            Some(mime::APPLICATION_JSON.as_ref().as_bytes())
        );
    }
}
