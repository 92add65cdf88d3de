//! Error types for the Pushbullet client.
//!
//! Every failure a client call can produce is folded into the single
//! `PbError` enum, with conversions from the underlying library errors.

use thiserror::Error;

/// Convenience type alias for Results using PbError.
pub type PbResult<T> = Result<T, PbError>;

/// Unified error type for settings, authentication, and HTTP failures.
#[derive(Error, Debug)]
pub enum PbError {
    // -- Configuration errors --
    /// No usable settings, or `auth.type` missing or unrecognized.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Authentication errors --
    /// Credentials were rejected and there is nothing left to try.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // -- Network errors --
    /// The server answered with a non-2xx status.
    #[error("request failed (status {status}): {body}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Transport-level failure: DNS, connect, timeout, reset.
    #[error("connection error: {0}")]
    Connection(String),

    // -- Caller errors --
    /// The request descriptor or arguments were invalid.
    #[error("usage error: {0}")]
    Usage(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PbError {
    /// HTTP status carried by the error, if it came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            PbError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-side retry could reasonably succeed.
    ///
    /// The client itself never retries; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            PbError::Connection(_) => true,
            PbError::Request { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for PbError {
    fn from(e: serde_json::Error) -> Self {
        PbError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pb_error_display() {
        let err = PbError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");

        let err = PbError::Request {
            status: 404,
            body: "{\"error\":\"not found\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "request failed (status 404): {\"error\":\"not found\"}"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(PbError::Connection("reset".into()).is_retryable());
        assert!(PbError::Request { status: 503, body: String::new() }.is_retryable());
        assert!(PbError::Request { status: 429, body: String::new() }.is_retryable());
        assert!(!PbError::Request { status: 400, body: String::new() }.is_retryable());
        assert!(!PbError::AuthFailed("nope".into()).is_retryable());
        assert!(!PbError::Config("missing".into()).is_retryable());
    }

    #[test]
    fn test_status_accessor() {
        let err = PbError::Request { status: 401, body: String::new() };
        assert_eq!(err.status(), Some(401));
        assert_eq!(PbError::Usage("x".into()).status(), None);
    }
}
