//! Error type shared by the client, the executor, and the kernel operations.

use thiserror::Error;

/// Every failure the kernel can surface to a caller.
///
/// The [`Display`](std::fmt::Display) text doubles as the input to
/// [`classify_error`](crate::api::retry::classify_error), so variants that
/// wrap remote responses keep the raw body in their message.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Non-2xx HTTP response.
    #[error("Gemini API HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Error envelope returned inside an otherwise readable response.
    #[error("Gemini API error {code} ({status}): {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },

    /// The request never produced a response (connect, DNS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The response body or a model-produced JSON payload did not parse.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// An image input was missing or was not a usable data URL.
    #[error("{0}")]
    EmptyBuffer(&'static str),

    /// The model answered but returned no inline image.
    #[error("{0}")]
    NoImage(String),

    /// Credential reselection could not complete.
    #[error("credential reselection failed: {0}")]
    Credential(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KernelError {
    /// HTTP-level status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KernelError::Http { status, .. } => Some(*status),
            KernelError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for KernelError {
    fn from(e: reqwest::Error) -> Self {
        KernelError::Request(e.to_string())
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(e: serde_json::Error) -> Self {
        KernelError::Parse(e.to_string())
    }
}
