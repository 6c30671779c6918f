use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

use crate::models::{ErrorResponse, Problem};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Startup configuration failures. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("[in config] missing required environment variable {0}")]
    Missing(&'static str),

    #[error("[in config] invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure of a retried operation.
#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("invalid retry duration supplied")]
    InvalidDuration,

    #[error("retry deadline of {max_duration:?} exceeded after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        max_duration: Duration,
        #[source]
        last: E,
    },

    #[error("retry deadline of {max_duration:?} exceeded before attempt {attempts} completed")]
    DeadlineExceeded { attempts: u32, max_duration: Duration },
}

impl<E> RetryError<E> {
    /// Number of attempts started before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::InvalidDuration => 0,
            RetryError::Exhausted { attempts, .. } | RetryError::DeadlineExceeded { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Which half of connection establishment gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Ping,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Connect => write!(f, "connect to"),
            Stage::Ping => write!(f, "ping"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("[in database::connect] invalid retry duration supplied: {0:?}")]
    InvalidRetryDuration(Duration),

    #[error(
        "[in database::connect] failed to {stage} database with retry duration of {max_duration:?} and {attempts} attempts: {source}"
    )]
    Exhausted {
        stage: Stage,
        max_duration: Duration,
        attempts: u32,
        #[source]
        source: BoxError,
    },
}

/// Rejection produced by the decode-validate-map pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("[in decode_validate_body] decode json: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("[in decode_validate_body] invalid {input}: {} problems", .problems.len())]
    Invalid {
        input: &'static str,
        problems: Vec<Problem>,
    },

    #[error("[in decode_validate_body] error mapping input {input} to {output}: {source}")]
    Mapping {
        input: &'static str,
        output: &'static str,
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Validation problems, empty unless validation failed.
    pub fn problems(&self) -> &[Problem] {
        match self {
            PipelineError::Invalid { problems, .. } => problems,
            _ => &[],
        }
    }
}

/// A failed query against the user store.
#[derive(Error, Debug)]
#[error("[in {operation}]: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl StoreError {
    pub fn new(operation: &'static str, source: sqlx::Error) -> Self {
        Self { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Handler-level failures shared by every HTTP-style transport.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not a valid ID {raw:?}: {source}")]
    InvalidId {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error(transparent)]
    Body(#[from] PipelineError),

    #[error("error listing users: {0}")]
    ListUsers(#[source] StoreError),

    #[error("error updating user: {0}")]
    UpdateUser(#[source] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId { .. } | ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::ListUsers(_) | ApiError::UpdateUser(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-facing body. Internal detail stays in the logs.
    pub fn response(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidId { .. } => ErrorResponse::message("Not a valid ID"),
            ApiError::Body(PipelineError::Invalid { problems, .. }) => {
                ErrorResponse::validation(problems.clone())
            }
            ApiError::Body(_) => ErrorResponse::message("missing values or malformed body"),
            ApiError::ListUsers(_) => ErrorResponse::message("Error retrieving data"),
            ApiError::UpdateUser(_) => ErrorResponse::message("Error updating object"),
        }
    }
}

/// Outcome of a unit of work that did not finish normally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("recovered from panic: {0}")]
    Panicked(String),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("unit of work was cancelled")]
    Cancelled,
}
