// lucy/src/engine.rs
//! Engine boundary
//!
//! Every call into tantivy goes through [`guard`]. Engine error values are
//! classified into an [`EngineErrorKind`], and a panic unwinding out of the
//! engine is caught here and turned into an error instead of tearing down
//! the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tantivy::TantivyError;
use tantivy::directory::error::{LockError, OpenDirectoryError, OpenReadError};

use crate::error::{EngineError, EngineErrorKind, Result};

/// Conversion of a raw engine failure into an [`EngineError`].
pub(crate) trait IntoEngineError {
    fn into_engine_error(self, operation: &'static str) -> EngineError;
}

impl IntoEngineError for TantivyError {
    fn into_engine_error(self, operation: &'static str) -> EngineError {
        let kind = match &self {
            TantivyError::OpenDirectoryError(e) => directory_kind(e),
            TantivyError::OpenReadError(OpenReadError::FileDoesNotExist(_)) => EngineErrorKind::NotAnIndex,
            TantivyError::LockFailure(LockError::LockBusy, _) => EngineErrorKind::LockBusy,
            TantivyError::SchemaError(_) => EngineErrorKind::SchemaMismatch,
            TantivyError::IoError(_) => EngineErrorKind::Io,
            _ => EngineErrorKind::Other,
        };
        EngineError::new(operation, kind, self.to_string()).with_source(self)
    }
}

impl IntoEngineError for OpenDirectoryError {
    fn into_engine_error(self, operation: &'static str) -> EngineError {
        EngineError::new(operation, directory_kind(&self), self.to_string()).with_source(self)
    }
}

impl IntoEngineError for OpenReadError {
    fn into_engine_error(self, operation: &'static str) -> EngineError {
        let kind = match &self {
            OpenReadError::FileDoesNotExist(_) => EngineErrorKind::NotAnIndex,
            _ => EngineErrorKind::Io,
        };
        EngineError::new(operation, kind, self.to_string()).with_source(self)
    }
}

impl IntoEngineError for std::io::Error {
    fn into_engine_error(self, operation: &'static str) -> EngineError {
        let kind = match self.kind() {
            std::io::ErrorKind::NotFound => EngineErrorKind::NotAnIndex,
            _ => EngineErrorKind::Io,
        };
        EngineError::new(operation, kind, self.to_string()).with_source(self)
    }
}

fn directory_kind(e: &OpenDirectoryError) -> EngineErrorKind {
    match e {
        OpenDirectoryError::DoesNotExist(_) | OpenDirectoryError::NotADirectory(_) => EngineErrorKind::NotAnIndex,
        _ => EngineErrorKind::Io,
    }
}

/// Run `f` against the engine, translating both returned errors and panics.
pub(crate) fn guard<T, E, F>(operation: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: IntoEngineError,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            let err = e.into_engine_error(operation);
            tracing::warn!(operation, kind = %err.kind(), "engine error: {}", err.message());
            Err(err.into())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(operation, "engine panicked: {}", message);
            Err(EngineError::new(operation, EngineErrorKind::Panic, message).into())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_guard_passes_value_through() {
        let value = guard("noop", || Ok::<_, TantivyError>(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_guard_translates_schema_error() {
        let err = guard("open", || {
            Err::<(), _>(TantivyError::SchemaError("schema does not match".into()))
        })
        .unwrap_err();
        let engine = err.as_engine().unwrap();
        assert_eq!(engine.kind(), EngineErrorKind::SchemaMismatch);
        assert_eq!(engine.operation(), "open");
    }

    #[test]
    fn test_guard_translates_missing_directory() {
        let err = guard("open", || {
            Err::<(), _>(OpenDirectoryError::DoesNotExist(PathBuf::from("/nowhere")))
        })
        .unwrap_err();
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::NotAnIndex);
    }

    #[test]
    fn test_guard_catches_panic() {
        let err = guard("commit", || -> std::result::Result<(), TantivyError> {
            panic!("segment writer exploded")
        })
        .unwrap_err();
        let engine = err.as_engine().unwrap();
        assert_eq!(engine.kind(), EngineErrorKind::Panic);
        assert_eq!(engine.message(), "segment writer exploded");
    }

    #[test]
    fn test_guard_catches_formatted_panic() {
        let err = guard("commit", || -> std::result::Result<(), TantivyError> {
            panic!("bad segment {}", 7)
        })
        .unwrap_err();
        assert_eq!(err.as_engine().unwrap().message(), "bad segment 7");
    }
}
