//! Error types for service client initialization.

/// Raised when the service credentials cannot be resolved.
///
/// This is a startup precondition: callers are expected to propagate it out
/// of initialization rather than recover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbAuthError {
    #[error("Missing credentials")]
    MissingCredentials,
}

/// Error type for constructing and using the service client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] DbAuthError),
    #[error("Invalid service URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Service key is not a valid header value")]
    InvalidKey,
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Result type for service client operations.
pub type ClientResult<T> = Result<T, ClientError>;
