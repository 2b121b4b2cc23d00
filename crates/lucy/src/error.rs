// lucy/src/error.rs
//! Error types
//!
//! Failures coming out of the engine are always wrapped in [`EngineError`]
//! so callers can tell them apart from local argument validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A tokenizer pattern failed to compile or matches the empty string.
    #[error("invalid tokenizer pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Argument validation failed before the engine was reached.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Whether this error originated inside the engine.
    pub fn is_engine(&self) -> bool {
        matches!(self, Error::Engine(_))
    }

    pub fn as_engine(&self) -> Option<&EngineError> {
        match self {
            Error::Engine(e) => Some(e),
            _ => None,
        }
    }
}

/// Coarse classification of engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The location does not exist or holds no index.
    NotAnIndex,
    /// Another writer holds the index lock.
    LockBusy,
    /// The supplied schema disagrees with the stored one, or the stored
    /// schema cannot be used.
    SchemaMismatch,
    Io,
    /// The engine panicked; the panic was caught at the boundary.
    Panic,
    Other,
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineErrorKind::NotAnIndex => "not an index",
            EngineErrorKind::LockBusy => "lock busy",
            EngineErrorKind::SchemaMismatch => "schema mismatch",
            EngineErrorKind::Io => "io",
            EngineErrorKind::Panic => "panic",
            EngineErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// An error raised by the engine, carrying its message and the operation
/// that was in flight.
#[derive(Debug, Error)]
#[error("engine error during {operation} ({kind}): {message}")]
pub struct EngineError {
    operation: &'static str,
    kind: EngineErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    pub(crate) fn new(operation: &'static str, kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> EngineErrorKind {
        self.kind
    }

    /// The engine's own message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}
