//! Error type for membership retrieval.

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// A source could not be retrieved.
///
/// One variant per failure family; the underlying error text is always
/// preserved so the operator can tell an API outage from actual drift.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport or HTTP status failure.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if the server answered at all.
        status: Option<u16>,
    },

    /// The server answered but the body was not what the contract promises.
    #[error("invalid response from {endpoint}: {message}")]
    InvalidResponse {
        /// Endpoint path that produced the body.
        endpoint: String,
        /// Decode error text.
        message: String,
    },
}

impl SourceError {
    /// Create an invalid-response error with endpoint context.
    pub fn invalid(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for SourceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse {
            endpoint: String::new(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = SourceError::Http {
            message: "connection refused".to_string(),
            status: None,
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_status_code_conversion() {
        let err: SourceError = ureq::Error::StatusCode(503).into();
        match err {
            SourceError::Http { status, message } => {
                assert_eq!(status, Some(503));
                assert!(message.contains("503"));
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_response_display() {
        let err = SourceError::invalid("/v1/agent/members", "missing field `address`");
        let text = err.to_string();
        assert!(text.contains("/v1/agent/members"));
        assert!(text.contains("missing field"));
    }
}
