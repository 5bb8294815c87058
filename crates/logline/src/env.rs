//! Environment snapshot consumed by the configuration resolvers.
//!
//! # Design
//! - Read the process environment once at startup and pass the snapshot by reference.
//! - Only the variables the resolvers understand are retained.

/// Log level override (`trace`, `debug`, `info`, `warn`, `error`, `verbose`).
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Output format selector (`json`, `logfmt`, `pretty`).
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
/// Runtime marker; `development` switches the default level to `debug`.
pub const ENV_APP_ENV: &str = "APP_ENV";
/// Comma-separated base fields to omit, or `none`.
pub const ENV_LOG_OMIT_FIELDS: &str = "LOG_OMIT_FIELDS";
/// Flatten toggle for logfmt output.
pub const ENV_LOG_FLATTEN_NESTED: &str = "LOG_FLATTEN_NESTED";

const DEVELOPMENT: &str = "development";

/// Point-in-time copy of the logging-related environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    log_level: Option<String>,
    log_format: Option<String>,
    app_env: Option<String>,
    omit_fields: Option<String>,
    flatten_nested: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Build a snapshot from explicit key/value pairs; unknown keys are ignored.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut snapshot = Self::default();
        for (key, value) in vars {
            let slot = match key.as_ref() {
                ENV_LOG_LEVEL => &mut snapshot.log_level,
                ENV_LOG_FORMAT => &mut snapshot.log_format,
                ENV_APP_ENV => &mut snapshot.app_env,
                ENV_LOG_OMIT_FIELDS => &mut snapshot.omit_fields,
                ENV_LOG_FLATTEN_NESTED => &mut snapshot.flatten_nested,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        snapshot
    }

    /// Raw `LOG_LEVEL` value.
    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    /// Raw `LOG_FORMAT` value.
    #[must_use]
    pub fn log_format(&self) -> Option<&str> {
        self.log_format.as_deref()
    }

    /// Raw `LOG_OMIT_FIELDS` value.
    #[must_use]
    pub fn omit_fields(&self) -> Option<&str> {
        self.omit_fields.as_deref()
    }

    /// Raw `LOG_FLATTEN_NESTED` value.
    #[must_use]
    pub fn flatten_nested(&self) -> Option<&str> {
        self.flatten_nested.as_deref()
    }

    /// Whether the runtime marker identifies a development environment.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.app_env.as_deref() == Some(DEVELOPMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vars_keeps_known_keys_only() {
        let env = EnvSnapshot::from_vars([
            ("LOG_LEVEL", "warn"),
            ("LOG_FORMAT", "logfmt"),
            ("HOME", "/root"),
        ]);
        assert_eq!(env.log_level(), Some("warn"));
        assert_eq!(env.log_format(), Some("logfmt"));
        assert!(env.omit_fields().is_none());
        assert!(env.flatten_nested().is_none());
        assert!(!env.is_development());
    }

    #[test]
    fn development_marker_is_exact() {
        assert!(EnvSnapshot::from_vars([("APP_ENV", "development")]).is_development());
        assert!(!EnvSnapshot::from_vars([("APP_ENV", "production")]).is_development());
        assert!(!EnvSnapshot::from_vars([("APP_ENV", "Development")]).is_development());
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let env = EnvSnapshot::from_vars([("LOG_LEVEL", "warn"), ("LOG_LEVEL", "error")]);
        assert_eq!(env.log_level(), Some("error"));
    }
}
