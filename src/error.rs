//! Error types for quill's generation layer.
//!
//! Covers the failure modes the library core can hit:
//! - LLM requests (subprocess failures, rate limits, malformed responses)
//! - Session persistence (corrupted JSON)
//! - File I/O
//!
//! Command-level and git plumbing use `anyhow` with context instead; the
//! variants here exist where callers need to branch on the failure kind
//! (retry policy, user-facing quota messages).

use std::fmt;
use std::io;

/// Result type alias for quill's generation layer
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quill
#[derive(Debug)]
pub enum Error {
    /// LLM request errors
    Llm(LlmError),
    /// Session file errors
    Session(SessionError),
    /// I/O errors
    Io(io::Error),
}

/// LLM request errors
#[derive(Debug)]
pub enum LlmError {
    /// Subprocess or network request failed (spawn error, timeout)
    RequestFailed { model: String, source: String },
    /// Response malformed (invalid UTF-8, unexpected shape)
    InvalidResponse { model: String, details: String },
    /// Rate limit or quota exceeded (429 response)
    RateLimitExceeded { model: String, retry_after: Option<u64> },
    /// API authentication failed (invalid or missing key)
    AuthenticationFailed(String),
    /// Model unavailable (503, model offline)
    ModelUnavailable(String),
}

/// Session file errors
#[derive(Debug)]
pub enum SessionError {
    /// Session JSON is corrupted or doesn't match the schema
    CorruptedData { path: String, details: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Llm(e) => write!(f, "LLM error: {}", e),
            Error::Session(e) => write!(f, "Session error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::RequestFailed { model, source } => {
                write!(f, "Request to {} failed: {}", model, source)
            }
            LlmError::InvalidResponse { model, details } => {
                write!(f, "Invalid response from {}: {}", model, details)
            }
            LlmError::RateLimitExceeded { model, retry_after } => match retry_after {
                Some(seconds) => write!(
                    f,
                    "Rate limit exceeded for {} (retry after {} seconds)",
                    model, seconds
                ),
                None => write!(f, "Rate limit exceeded for {}", model),
            },
            LlmError::AuthenticationFailed(model) => {
                write!(f, "Authentication failed for {}", model)
            }
            LlmError::ModelUnavailable(model) => {
                write!(f, "Model unavailable: {}", model)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::CorruptedData { path, details } => {
                write!(f, "Session data corrupted at {}: {}", path, details)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl std::error::Error for LlmError {}
impl std::error::Error for SessionError {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Check if error is retryable (transient request failures, rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Llm(LlmError::RequestFailed { .. })
                | Error::Llm(LlmError::RateLimitExceeded { .. })
                | Error::Llm(LlmError::ModelUnavailable(_))
        )
    }
}
