//! Error taxonomy surfaced by every client call.
//!
//! # Design
//! Seven kinds, one per outcome the UI reacts to. The message text of each
//! variant is load-bearing: screens display it verbatim and some match on
//! its prefix, so the `#[error]` strings must not drift.
//!
//! `Internal` is also where every transport failure ends up. Its message
//! never mentions the cause, but the cause is kept as the error source so
//! logs and debuggers can still reach it.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Message of [`ApiError::Internal`].
pub const INTERNAL_ERROR_MESSAGE: &str = "API ERROR: An internal server error has occured";

/// Message of [`ApiError::InvalidCredentials`].
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username/password";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400. `message` is the status text.
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Option<Value>,
    },

    /// 401.
    #[error("Invalid username/password")]
    InvalidCredentials,

    /// 404.
    #[error("RECORD NOT FOUND: {status_text}")]
    NotFound { status_text: String },

    /// 422. `entity` holds the field-level validation details.
    #[error("ENTITY Error: {status_text}")]
    BadEntity {
        status_text: String,
        entity: Option<Value>,
    },

    /// 409. `message` is the status text.
    #[error("{message}")]
    RecordConflict {
        message: String,
        errors: Option<Value>,
    },

    /// 502 from the gateway in front of the API.
    #[error("API SERVICE_ERROR: {detail}")]
    ServiceError { detail: String },

    /// Any other status, or no response at all.
    #[error("API ERROR: An internal server error has occured")]
    Internal {
        #[source]
        cause: Option<ErrorCause>,
    },
}

/// Why an [`ApiError::Internal`] was produced, when known.
#[derive(Debug, Error)]
pub enum ErrorCause {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("response body could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("request body could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Kind names as consumers know them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    InvalidCredentials,
    NotFound,
    BadEntity,
    RecordConflict,
    ApiServiceError,
    ApiError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::InvalidCredentials => "InvalidCredentials",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::BadEntity => "BadEntity",
            ErrorKind::RecordConflict => "RecordConflict",
            ErrorKind::ApiServiceError => "ApiServiceError",
            ErrorKind::ApiError => "ApiError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    pub fn internal() -> Self {
        ApiError::Internal { cause: None }
    }

    /// Attach `cause` to an `Internal` error; other kinds are returned as is.
    pub fn caused_by(self, cause: impl Into<ErrorCause>) -> Self {
        match self {
            ApiError::Internal { .. } => ApiError::Internal {
                cause: Some(cause.into()),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest { .. } => ErrorKind::BadRequest,
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::BadEntity { .. } => ErrorKind::BadEntity,
            ApiError::RecordConflict { .. } => ErrorKind::RecordConflict,
            ApiError::ServiceError { .. } => ErrorKind::ApiServiceError,
            ApiError::Internal { .. } => ErrorKind::ApiError,
        }
    }

    /// Structured details returned by the server, for the kinds that carry them.
    pub fn errors(&self) -> Option<&Value> {
        match self {
            ApiError::BadRequest { errors, .. } | ApiError::RecordConflict { errors, .. } => {
                errors.as_ref()
            }
            ApiError::BadEntity { entity, .. } => entity.as_ref(),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        match self {
            ApiError::Internal { cause } => cause.as_ref(),
            _ => None,
        }
    }
}
