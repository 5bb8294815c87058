//! Request logger options and construction.

use logline::{EnvSnapshot, LoggerOptions, LoggingConfig, LoggingResult, TimeFormat, init_logging};
use serde::Deserialize;

use crate::layer::RequestLoggingLayer;

/// Options for [`RequestLogger`]; unset toggles default to enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestLoggingOptions {
    /// Shared logger options.
    #[serde(flatten)]
    pub logger: LoggerOptions,
    /// Emit a completion event per request.
    pub auto_logging: Option<bool>,
    /// Record the client IP derived from `x-forwarded-for`.
    pub forwarded_ip: Option<bool>,
}

impl RequestLoggingOptions {
    /// Apply `overrides` on top of `self`; every field set in `overrides` wins.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            logger: self.logger.merge(overrides.logger),
            auto_logging: overrides.auto_logging.or(self.auto_logging),
            forwarded_ip: overrides.forwarded_ip.or(self.forwarded_ip),
        }
    }
}

/// Resolved configuration plus the matching request layer.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    config: LoggingConfig,
    layer: RequestLoggingLayer,
}

impl RequestLogger {
    /// Resolve `options` against `env`. Timestamps are RFC 3339.
    #[must_use]
    pub fn new(options: &RequestLoggingOptions, env: &EnvSnapshot) -> Self {
        let config =
            LoggingConfig::resolve(&options.logger, env).with_time_format(TimeFormat::Rfc3339);
        let layer = RequestLoggingLayer::new()
            .with_auto_logging(options.auto_logging.unwrap_or(true))
            .with_forwarded_ip(options.forwarded_ip.unwrap_or(true));
        Self { config, layer }
    }

    /// The resolved logging configuration.
    #[must_use]
    pub const fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// The request layer to stack onto a service.
    #[must_use]
    pub const fn layer(&self) -> RequestLoggingLayer {
        self.layer
    }

    /// Install the global subscriber for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already set.
    pub fn install(&self) -> LoggingResult<()> {
        init_logging(&self.config)
    }
}
