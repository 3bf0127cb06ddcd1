use std::fmt::Display;

use authz_types::error::{ApiError, StatusCode};
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Error, Debug)]
pub enum ErrorType {
    #[error("Internal error")]
    Storage(#[source] sqlx::Error),
    #[error("Internal error")]
    InternalError(#[source] anyhow::Error),
    #[error("Internal error")]
    BadData(String),
    #[error("Internal error")]
    BadResponseData(#[source] serde_json::Error),
    #[error("Internal error")]
    Migration {
        filename: String,
        #[source]
        error: sqlx::Error,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Role `{0}` is immutable")]
    ImmutableRole(String),
}

#[derive(Error, Debug)]
pub struct Error {
    pub variant: ErrorType,
    pub span_trace: SpanTrace,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.variant, self.span_trace)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self {
            variant: ErrorType::Storage(err),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<ErrorType> for Error {
    fn from(err: ErrorType) -> Self {
        Self {
            variant: err,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status_code = match err.variant {
            ErrorType::Storage(_)
            | ErrorType::InternalError(_)
            | ErrorType::BadData(_)
            | ErrorType::BadResponseData(_)
            | ErrorType::Migration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorType::BadRequest(_) => StatusCode::BAD_REQUEST,
            ErrorType::ImmutableRole(_) => StatusCode::FORBIDDEN,
        };

        let mut api_err = ApiError::new(status_code, err.variant.to_string());
        api_err.span_trace = Some(err.span_trace);
        api_err
    }
}
