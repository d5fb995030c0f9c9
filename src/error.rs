//! Error types shared by the resolver, the field and the widget

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring, searching or looking up candidates
#[derive(Debug, Error)]
pub enum Error {
    /// The field or its source is misconfigured (no searchable fields,
    /// malformed search field, unknown source...)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The field is disabled or read-only in its current form context
    #[error("field '{0}' is disabled or read-only")]
    Forbidden(String),

    /// The configured label attribute does not exist on a matched record
    #[error("can't find field called '{field}' on {class}")]
    AttributeMissing { field: String, class: String },

    /// No field registered under this name
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The data source failed while running a query
    #[error("source error: {0}")]
    Source(String),

    /// Lookup request failed on the client side
    #[error("lookup failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Lookup response was not a valid candidate list
    #[error("malformed lookup response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Lookup endpoint answered with a non-success status
    #[error("lookup endpoint returned HTTP {0}")]
    Status(u16),

    /// Field markup could not be bound
    #[error("invalid field markup: {0}")]
    Markup(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl Error {
    /// HTTP status used when this error aborts a request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::UnknownField(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request aborted: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
