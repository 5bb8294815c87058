//! Subscriber construction and global installation.
//!
//! # Design
//! - A single entry point installs the subscriber for the resolved configuration.
//! - `json` and `logfmt` go through [`RecordLayer`]; `pretty` uses the compact fmt layer.
//! - Construction is separate from installation so callers can scope a subscriber.

use std::io;

use tracing::{Subscriber, debug};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggerOptions, LoggingConfig};
use crate::env::EnvSnapshot;
use crate::error::{LoggingError, LoggingResult};
use crate::format::LogFormat;
use crate::layer::RecordLayer;

/// Boxed subscriber ready to be installed or scoped.
pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Configure and install the global tracing subscriber writing to stdout.
///
/// # Errors
///
/// Returns [`LoggingError::SubscriberInstall`] if a global subscriber is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> LoggingResult<()> {
    build_subscriber(config, io::stdout)
        .try_init()
        .map_err(|source| LoggingError::SubscriberInstall { source })?;
    debug!(
        level = config.level.as_str(),
        format = config.format.as_str(),
        "logging initialised"
    );
    Ok(())
}

/// Build the subscriber for `config` without installing it.
#[must_use]
pub fn build_subscriber<W>(config: &LoggingConfig, make_writer: W) -> BoxedSubscriber
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(EnvFilter::new(config.level.as_str()));
    match config.format {
        LogFormat::Pretty => Box::new(
            registry.with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(make_writer),
            ),
        ),
        LogFormat::Json | LogFormat::Logfmt => {
            Box::new(registry.with(RecordLayer::new(config, make_writer)))
        }
    }
}

/// Resolve `options` against `env` and install the resulting subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::SubscriberInstall`] if a global subscriber is
/// already set.
pub fn create_logger(options: &LoggerOptions, env: &EnvSnapshot) -> LoggingResult<LoggingConfig> {
    let config = LoggingConfig::resolve(options, env);
    init_logging(&config)?;
    Ok(config)
}
