//! # Design
//!
//! - Keep error messages constant while carrying context fields for debugging.
//! - Configuration resolution never fails; only subscriber installation and sink writes do.
//! - Preserve source errors so a dropped log line is always visible to the caller.

use std::io;

use thiserror::Error;

/// Result alias for logging operations.
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Errors raised while installing the subscriber or writing log output.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Installing the global tracing subscriber failed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// Writing a formatted line to the output sink failed.
    #[error("failed to write log output")]
    SinkWrite {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The record queue was closed before the record could be accepted.
    #[error("log transport closed")]
    TransportClosed,
    /// The background transport task panicked or was cancelled.
    #[error("log transport task failed")]
    TransportTask {
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
}

impl LoggingError {
    pub(crate) const fn sink(operation: &'static str, source: io::Error) -> Self {
        Self::SinkWrite { operation, source }
    }
}
