//! Error types for the cars client.
//!
//! # Design
//! `CarError` is a closed set: every failure an operation can observe maps to
//! exactly one variant. "Not found" and "server error" are not told apart
//! beyond the raw status code in `ResponseStatusCode`.
//!
//! Transport causes are captured as `TransportError`, which carries strings
//! rather than the HTTP library's error type so that `CarError` stays
//! `Clone + Eq` and can be compared in tests.

use thiserror::Error;

/// Errors returned by every cars client operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarError {
    /// An endpoint string could not be parsed into a request target.
    #[error("invalid endpoint URL: {0}")]
    Url(String),

    /// The transport failed before a response was received.
    #[error("request failed: {0}")]
    TaskError(#[from] TransportError),

    /// The transport produced no response object.
    #[error("no response received")]
    NoResponse,

    /// A response arrived without a body.
    #[error("response carried no data")]
    NoData,

    /// The server answered with a status other than 200.
    #[error("unexpected HTTP status {0}")]
    ResponseStatusCode(u16),

    /// The body could not be decoded into the expected records.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Update or delete was requested for a car the server never assigned an id to.
    #[error("car has no server-assigned id")]
    MissingId,

    /// The car could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl CarError {
    /// Short stable name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CarError::Url(_) => "url",
            CarError::TaskError(_) => "task_error",
            CarError::NoResponse => "no_response",
            CarError::NoData => "no_data",
            CarError::ResponseStatusCode(_) => "response_status_code",
            CarError::InvalidJson(_) => "invalid_json",
            CarError::MissingId => "missing_id",
            CarError::Serialization(_) => "serialization",
        }
    }
}

/// Network-level failures reported by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    /// The request could not be built or sent.
    #[error("{0}")]
    Request(String),

    /// The response body could not be read.
    #[error("reading body failed: {0}")]
    Body(String),
}

/// Errors raised while loading a `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
