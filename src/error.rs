use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::upstream::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorVerbosity {
    /// Server returns only the appropriate status code with an empty body.
    StatusCode,
    /// Server returns a generic message for the kind of error with the appropriate status code.
    Message,
    /// Server returns the full error reason with the appropriate status code.
    #[default]
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_message(&self) -> bool {
        matches!(self, ErrorVerbosity::Message | ErrorVerbosity::Full)
    }

    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Body of every failed response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub error: String,
}

#[derive(Debug, From)]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Upstream error
    ///
    /// This error is returned when the archive could not be fetched or parsed.
    Upstream(UpstreamFailure),
    /// Query error
    ///
    /// This error is returned when the query parameters are not as expected.
    Query(QueryError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested resource is not found.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Upstream(err) => err.verbosity,
            ApiError::Query(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Upstream(_) => "Failed to fetch the archive",
            ApiError::Query(_) => "Failed to parse query parameters",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            ApiError::InternalServerError(err) => err.internal_server_error.as_deref(),
            ApiError::Upstream(err) => err.upstream_error_reason.as_deref(),
            ApiError::Query(err) => err.query_error_reason.as_deref(),
            ApiError::MethodNotAllowed(_) | ApiError::NotFound(_) => None,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) | ApiError::Upstream(_) | ApiError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let verbosity = self.verbosity();

        if !verbosity.should_generate_message() {
            return status_code.into_response();
        }

        let error = self.reason().unwrap_or(self.message()).to_string();

        (
            status_code,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

#[derive(Debug)]
pub struct InternalServerError {
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug)]
pub struct UpstreamFailure {
    verbosity: ErrorVerbosity,
    upstream_error_reason: Option<String>,
}

impl UpstreamFailure {
    pub fn new(verbosity: ErrorVerbosity, err: &UpstreamError) -> Self {
        let upstream_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| err.to_string());

        UpstreamFailure {
            verbosity,
            upstream_error_reason,
        }
    }
}

#[derive(Debug)]
pub struct QueryError {
    verbosity: ErrorVerbosity,
    query_error_reason: Option<String>,
}

impl QueryError {
    pub fn new(verbosity: ErrorVerbosity, query_error_reason: String) -> Self {
        let query_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(query_error_reason);

        QueryError {
            verbosity,
            query_error_reason,
        }
    }
}

#[derive(Debug)]
pub struct MethodNotAllowedError {
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug)]
pub struct NotFoundError {
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}
