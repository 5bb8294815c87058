//! Log level names and resolution.

use std::fmt::{self, Display, Formatter};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

use crate::env::EnvSnapshot;

/// Severity threshold accepted by the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Most verbose; `verbose` is accepted as an alias.
    Trace,
    /// Diagnostic output.
    Debug,
    /// Default production level.
    Info,
    /// Recoverable problems.
    Warn,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Lower-case level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a known level name; `verbose` normalizes to [`LogLevel::Trace`].
    ///
    /// Matching is exact: `INFO` is not a known name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trace" | "verbose" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        Self::from_level(level.into())
    }
}

/// Resolve the active level.
///
/// Precedence: a recognised explicit override, then a recognised `LOG_LEVEL`,
/// then `debug` when `LOG_LEVEL` is unset and the development marker is present,
/// otherwise `info`. Unrecognised values never fail; they fall through.
#[must_use]
pub fn resolve_log_level(override_level: Option<&str>, env: &EnvSnapshot) -> LogLevel {
    if let Some(level) = override_level
        .filter(|value| !value.is_empty())
        .and_then(LogLevel::parse)
    {
        return level;
    }

    match env.log_level().filter(|value| !value.is_empty()) {
        Some(value) => LogLevel::parse(value).unwrap_or(LogLevel::Info),
        None if env.is_development() => LogLevel::Debug,
        None => LogLevel::Info,
    }
}
