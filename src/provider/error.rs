// ABOUTME: Cloud API error types with SNAFU pattern.
// ABOUTME: Separates transport, HTTP status, remote API and decode failures.

use snafu::Snafu;

/// Failure of a single cloud API call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("{action}: request failed: {source}"))]
    Transport {
        action: String,
        source: reqwest::Error,
    },

    #[snafu(display("{action}: HTTP {status}: {body}"))]
    Status {
        action: String,
        status: u16,
        body: String,
    },

    #[snafu(display("{action}: {code}: {message}"))]
    Remote {
        action: String,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[snafu(display("{action}: failed to encode request: {source}"))]
    Encode {
        action: String,
        source: serde_json::Error,
    },

    #[snafu(display("{action}: unexpected response: {source}"))]
    Decode {
        action: String,
        source: serde_json::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network or TLS failure before a response arrived.
    Transport,
    /// Non-success HTTP status without a structured error body.
    Status,
    /// Structured error reported by the provider.
    Remote,
    /// Request or response did not match the expected shape.
    Malformed,
}

impl ApiError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Transport { .. } => ApiErrorKind::Transport,
            ApiError::Status { .. } => ApiErrorKind::Status,
            ApiError::Remote { .. } => ApiErrorKind::Remote,
            ApiError::Encode { .. } | ApiError::Decode { .. } => ApiErrorKind::Malformed,
        }
    }

    /// Provider error code, if the provider returned one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}
