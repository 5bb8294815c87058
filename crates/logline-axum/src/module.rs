//! Root logger module wiring configuration and request logging into a router.
//!
//! # Design
//! - Resolve once in [`LoggerModule::for_root`]; installation and layering reuse that result.
//! - The request span `path` is the matched route template when axum provides one,
//!   which keeps path parameters out of log cardinality.
//! - The client peer comes from `ConnectInfo<SocketAddr>`, present when the app is
//!   served with `into_make_service_with_connect_info`.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::Extensions;
use logline::{EnvSnapshot, LoggerOptions, LoggingConfig, LoggingResult, init_logging};
use logline_tower::RequestLoggingLayer;
use serde::Deserialize;

/// Options for [`LoggerModule`]; unset toggles default to enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerModuleOptions {
    /// Shared logger options.
    #[serde(flatten)]
    pub logger: LoggerOptions,
    /// Emit a completion event per request.
    pub http_logging: Option<bool>,
    /// Record the client IP derived from `x-forwarded-for`.
    pub forwarded_ip: Option<bool>,
}

impl LoggerModuleOptions {
    /// Apply `overrides` on top of `self`; every field set in `overrides` wins.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            logger: self.logger.merge(overrides.logger),
            http_logging: overrides.http_logging.or(self.http_logging),
            forwarded_ip: overrides.forwarded_ip.or(self.forwarded_ip),
        }
    }
}

/// Resolved logging setup for an axum application.
#[derive(Debug, Clone)]
pub struct LoggerModule {
    config: LoggingConfig,
    http_logging: bool,
    forwarded_ip: bool,
}

impl LoggerModule {
    /// Resolve `options` against `env`.
    #[must_use]
    pub fn for_root(options: &LoggerModuleOptions, env: &EnvSnapshot) -> Self {
        Self {
            config: LoggingConfig::resolve(&options.logger, env),
            http_logging: options.http_logging.unwrap_or(true),
            forwarded_ip: options.forwarded_ip.unwrap_or(true),
        }
    }

    /// The resolved logging configuration.
    #[must_use]
    pub const fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Install the global subscriber for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already set.
    pub fn install(&self) -> LoggingResult<()> {
        init_logging(&self.config)
    }

    /// Request layer reading the peer and route from axum's extensions.
    #[must_use]
    pub const fn layer(&self) -> RequestLoggingLayer {
        RequestLoggingLayer::new()
            .with_auto_logging(self.http_logging)
            .with_forwarded_ip(self.forwarded_ip)
            .with_peer_addr(connect_info_peer)
            .with_route(matched_path)
    }

    /// Wrap every route of `router` with the request layer.
    #[must_use]
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(self.layer())
    }
}

fn connect_info_peer(extensions: &Extensions) -> Option<SocketAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .or_else(|| extensions.get::<SocketAddr>().copied())
}

fn matched_path(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
}
