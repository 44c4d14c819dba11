use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by [`crate::Client`].
///
/// Every variant except `Config` names the operation that failed (`get
/// crypto`, `update transaction 7`, ...) and keeps the underlying error as its
/// source.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("{op}: invalid request: {source}")]
    InvalidRequest {
        op: String,
        #[source]
        source: ValidationError,
    },
    #[error("{op}: encode request: {source}")]
    Encode {
        op: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{op}: {source}")]
    Transport {
        op: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{op}: HTTP {status}: {body}")]
    Status {
        op: String,
        status: StatusCode,
        body: String,
    },
    #[error("{op}: decode response: {source}")]
    Decode {
        op: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{op}: invalid response: {source}")]
    InvalidResponse {
        op: String,
        #[source]
        source: ValidationError,
    },
    #[error("{op}: server error: {message}")]
    Api { op: String, message: String },
}

impl ClientError {
    /// Operation label, `None` for configuration errors.
    pub fn op(&self) -> Option<&str> {
        match self {
            Self::Config(_) => None,
            Self::InvalidRequest { op, .. }
            | Self::Encode { op, .. }
            | Self::Transport { op, .. }
            | Self::Status { op, .. }
            | Self::Decode { op, .. }
            | Self::InvalidResponse { op, .. }
            | Self::Api { op, .. } => Some(op),
        }
    }

    /// HTTP status of a non-2xx response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field-level violation, on either side of the wire.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::InvalidRequest { source, .. } | Self::InvalidResponse { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn messages_lead_with_the_operation() {
        let err = ClientError::Status {
            op: "get crypto".to_string(),
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"error": "Unauthorized"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"get crypto: HTTP 401 Unauthorized: {"error": "Unauthorized"}"#
        );
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.op(), Some("get crypto"));
    }

    #[test]
    fn validation_errors_stay_inspectable() {
        let err = ClientError::InvalidRequest {
            op: "update transaction 7".to_string(),
            source: ValidationError::new("date", "bad"),
        };
        assert_eq!(err.to_string(), "update transaction 7: invalid request: date: bad");
        assert_eq!(err.validation().map(|v| v.field.as_str()), Some("date"));
        assert!(err.source().is_some());
    }
}
