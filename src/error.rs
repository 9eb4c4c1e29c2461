//! Error types for the contact relay.

use std::fmt;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Broad cause reported by the mail transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// The server rejected the account credentials.
    Authentication,
    /// The server could not be reached, the session dropped, or it timed out.
    Connection,
    /// Any other rejection or local failure.
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Authentication => "authentication",
            Self::Connection => "connection",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Mail transport failure, classified by cause.
///
/// `message` carries raw transport detail and is only ever logged.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind} failure{}: {message}", code_suffix(.code))]
pub struct TransportError {
    pub kind: TransportFailureKind,
    /// SMTP reply code, when the server answered.
    pub code: Option<String>,
    pub message: String,
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl TransportError {
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Authentication, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Connection, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Other, message)
    }
}

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
