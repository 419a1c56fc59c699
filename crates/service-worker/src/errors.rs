use shared::ConfigError;
use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{context}: {inner}")]
    WithContext {
        context: String,
        inner: Box<WorkerError>,
    },
}

impl WorkerError {
    /// The error with every layer of context removed
    pub fn root(&self) -> &WorkerError {
        match self {
            WorkerError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }
}

pub trait ErrorContext<E>: Sized {
    /// Add helpful context to errors
    ///
    /// `context` is provided as a closure to avoid potential formatting cost if
    /// the result isn't an error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> E;
    /// Add helpful context to errors
    fn context<S: Into<String>>(self, context: S) -> E;
}

pub trait ResultContext<T, E> {
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> Result<T, E>;
    fn context<S: Into<String>>(self, context: S) -> Result<T, E>;
}

impl<E: Into<WorkerError>> ErrorContext<WorkerError> for E {
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> WorkerError {
        self.context(context())
    }
    fn context<S: Into<String>>(self, context: S) -> WorkerError {
        WorkerError::WithContext {
            context: context.into(),
            inner: Box::new(self.into()),
        }
    }
}

impl<T, E: Into<WorkerError>> ResultContext<T, WorkerError> for Result<T, E> {
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F) -> Result<T, WorkerError> {
        self.map_err(|e| e.with_context(context))
    }
    fn context<S: Into<String>>(self, context: S) -> Result<T, WorkerError> {
        self.map_err(|e| e.context(context))
    }
}
