use pantry_common::error::ApiError;

/// Everything a client call can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status and a well-formed error body.
    #[error("HTTP {status}: {error}")]
    Api { status: u16, error: ApiError },

    /// The response body (success or error) was not the JSON we expected.
    #[error("malformed response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The server returned 204 where a body is part of the contract.
    #[error("unexpected empty response from {0}")]
    UnexpectedNoContent(String),

    /// Connection, TLS or body-read failure from the HTTP stack.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rejected locally; no request was sent.
    #[error("invalid EAN '{0}': must be 8 or 13 digits")]
    InvalidEan(String),

    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Machine-readable code of an API error, if this is one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { error, .. } => Some(&error.code),
            _ => None,
        }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Decode { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
