/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure kinds of a catalog fetch, one variant per pipeline stage.
///
/// Every variant is recoverable at the caller level: the operation that
/// produced it has already released its session and buffer, and retrying
/// the whole operation is always safe.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Opening the HTTP session failed before any response arrived.
    #[error("connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The server answered with a status other than 200.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// The declared body length does not fit the response buffer.
    /// Oversized bodies are rejected outright, never truncated.
    #[error("declared content length {declared} exceeds buffer capacity {cap}")]
    CapacityExceeded { declared: u64, cap: usize },

    /// The transport failed while draining the body.
    #[error("transport read failed: {0}")]
    ReadError(#[from] std::io::Error),

    /// The body is not a valid JSON document.
    #[error("malformed document at line {line}, column {column}: {msg}")]
    MalformedDocument {
        line: usize,
        column: usize,
        msg: String,
    },

    /// The document parsed, but a required field is absent or has the
    /// wrong type. `path` is the dotted path that failed to resolve.
    #[error("field missing in document: {path}")]
    FieldMissing { path: String },

    /// The response buffer could not be allocated.
    #[error("response buffer allocation failed")]
    AllocationFailed,
}

impl FetchError {
    pub(crate) fn malformed(err: &serde_json::Error) -> Self {
        FetchError::MalformedDocument {
            line: err.line(),
            column: err.column(),
            msg: err.to_string(),
        }
    }
}
