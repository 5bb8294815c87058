//! Logger options and the resolved logging configuration.
//!
//! # Design
//! - Option bags are merged explicitly, field by field, later bags winning.
//! - Resolution happens once; the resulting [`LoggingConfig`] is passed by reference.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::base::{BaseFields, resolve_base};
use crate::env::EnvSnapshot;
use crate::format::{FormatSelector, LogFormat, resolve_flatten_nested, resolve_log_format};
use crate::level::{LogLevel, resolve_log_level};
use crate::logfmt::LogfmtOptions;

/// Caller-supplied logger options; unset fields fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerOptions {
    /// Level override (`trace`, `debug`, `info`, `warn`, `error`, `verbose`).
    pub level: Option<String>,
    /// Format override.
    pub format: Option<LogFormat>,
    /// Legacy JSON toggle, consulted only when `format` is unset.
    pub json: Option<bool>,
    /// Logger name written as the `name` field.
    pub name: Option<String>,
}

impl LoggerOptions {
    /// Apply `overrides` on top of `self`; every field set in `overrides` wins.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            level: overrides.level.or(self.level),
            format: overrides.format.or(self.format),
            json: overrides.json.or(self.json),
            name: overrides.name.or(self.name),
        }
    }

    /// The explicit format choice, preferring `format` over the legacy flag.
    #[must_use]
    pub fn format_selector(&self) -> Option<FormatSelector> {
        self.format
            .map(FormatSelector::from)
            .or_else(|| self.json.map(FormatSelector::from))
    }
}

/// How the `time` field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Milliseconds since the Unix epoch.
    #[default]
    EpochMillis,
    /// RFC 3339 with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    Rfc3339,
}

impl TimeFormat {
    /// Render `now` as a record value.
    #[must_use]
    pub fn render(self, now: DateTime<Utc>) -> Value {
        match self {
            Self::EpochMillis => Value::from(now.timestamp_millis()),
            Self::Rfc3339 => Value::from(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Fully resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level emitted.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Optional logger name.
    pub name: Option<String>,
    /// Base fields attached to each record.
    pub base: BaseFields,
    /// Whether logfmt output flattens nested objects.
    pub flatten_nested: bool,
    /// Rendering of the `time` field.
    pub time_format: TimeFormat,
}

impl LoggingConfig {
    /// Resolve options against the environment snapshot.
    #[must_use]
    pub fn resolve(options: &LoggerOptions, env: &EnvSnapshot) -> Self {
        Self {
            level: resolve_log_level(options.level.as_deref(), env),
            format: resolve_log_format(options.format_selector(), env),
            name: options.name.clone().filter(|name| !name.is_empty()),
            base: resolve_base(env),
            flatten_nested: resolve_flatten_nested(env),
            time_format: TimeFormat::default(),
        }
    }

    /// Replace the timestamp rendering.
    #[must_use]
    pub const fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    /// Formatter options for the logfmt output path.
    #[must_use]
    pub fn logfmt_options(&self) -> LogfmtOptions {
        LogfmtOptions {
            flatten_nested_objects: self.flatten_nested,
            ..LogfmtOptions::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::resolve(&LoggerOptions::default(), &EnvSnapshot::default())
    }
}
