//! Output format selection.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::env::EnvSnapshot;

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// `key=value` lines, friendly to Loki and grep.
    Logfmt,
    /// Human-readable single-line output.
    #[default]
    Pretty,
}

impl LogFormat {
    /// Lower-case format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Logfmt => "logfmt",
            Self::Pretty => "pretty",
        }
    }

    /// Parse a format name, ignoring ASCII case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "logfmt" => Some(Self::Logfmt),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Explicit format choice: either a named format or the legacy `json` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelector {
    /// A named format.
    Format(LogFormat),
    /// Legacy boolean: `true` selects JSON, `false` selects pretty output.
    Json(bool),
}

impl FormatSelector {
    /// The format this selector stands for.
    #[must_use]
    pub const fn format(self) -> LogFormat {
        match self {
            Self::Format(format) => format,
            Self::Json(true) => LogFormat::Json,
            Self::Json(false) => LogFormat::Pretty,
        }
    }
}

impl From<LogFormat> for FormatSelector {
    fn from(format: LogFormat) -> Self {
        Self::Format(format)
    }
}

impl From<bool> for FormatSelector {
    fn from(json: bool) -> Self {
        Self::Json(json)
    }
}

/// Resolve the output format from an explicit selector or `LOG_FORMAT`, defaulting to pretty.
#[must_use]
pub fn resolve_log_format(selector: Option<FormatSelector>, env: &EnvSnapshot) -> LogFormat {
    if let Some(selector) = selector {
        return selector.format();
    }
    env.log_format()
        .and_then(LogFormat::parse)
        .unwrap_or_default()
}

/// Whether logfmt output should flatten nested objects.
///
/// Enabled unless `LOG_FLATTEN_NESTED` is `false` or `0`.
#[must_use]
pub fn resolve_flatten_nested(env: &EnvSnapshot) -> bool {
    !env.flatten_nested()
        .map(str::to_ascii_lowercase)
        .is_some_and(|value| value == "false" || value == "0")
}
