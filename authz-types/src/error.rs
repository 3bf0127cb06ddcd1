use http::header::CONTENT_TYPE;
use serde::Serialize;
use thiserror::Error;

pub use http::StatusCode;
use tracing_error::SpanTrace;

/// Public error returned by the sidecar's HTTP surface.
///
/// Only the message and status code go on the wire; the span trace stays
/// server-side for diagnostics, so internal failures never leak structural
/// detail to the gateway.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status_code: StatusCode,
    message: String,
    pub span_trace: Option<SpanTrace>,
}

/// Wire shape of every error response.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    #[must_use]
    pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            span_trace: Some(SpanTrace::capture()),
        }
    }

    #[must_use]
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad request")
    }

    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ApiError> for hyper::Response<hyper::Body> {
    fn from(err: ApiError) -> Self {
        let body = serde_json::to_vec(&ErrorBody {
            error: &err.message,
        })
        .unwrap_or_else(|_| b"{\"error\":\"Internal error\"}".to_vec());

        let mut response = hyper::Response::new(hyper::Body::from(body));
        *response.status_mut() = err.status_code;
        response.headers_mut().insert(
            CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_status_and_message() {
        let err = ApiError::forbidden("Role `osmo-default` is immutable");
        assert_eq!(err.status_code, StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Role `osmo-default` is immutable");
    }

    #[test]
    fn converts_into_a_json_error_response() {
        let response: hyper::Response<hyper::Body> = ApiError::not_found().into();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
    }
}
