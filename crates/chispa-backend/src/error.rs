use thiserror::Error;

/// Errors returned by the backend client.
///
/// `Display` output is what views show to the user, so API errors carry the
/// backend's own message without decoration.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A 2xx response that is missing something the caller relies on.
    #[error("unexpected backend response: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
