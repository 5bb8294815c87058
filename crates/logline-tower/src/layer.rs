//! Per-request logging middleware.
//!
//! # Design
//! - Every request runs inside an `http.request` span carrying method, path,
//!   request id and client IP, so handler events inherit those fields.
//! - Auto-logging emits one completion event per request: `request completed`, or
//!   `request errored` for service errors and 5xx responses.
//! - Peer address and route lookups are plain function pointers so each framework
//!   can read them from its own request extensions.

use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use std::time::Instant;

use http::{Extensions, Request, Response};
use tower::{Layer, Service};
use tracing::field::Empty;
use tracing::{Instrument, error, info, info_span};

use crate::ip::{HEADER_REQUEST_ID, client_ip};

/// Reads the peer socket address from request extensions.
pub type PeerAddrFn = fn(&Extensions) -> Option<SocketAddr>;
/// Reads the matched route template from request extensions.
pub type RouteFn = fn(&Extensions) -> Option<String>;

/// Wraps HTTP services with a request span and completion events.
#[derive(Debug, Clone, Copy)]
pub struct RequestLoggingLayer {
    auto_logging: bool,
    forwarded_ip: bool,
    peer_addr: PeerAddrFn,
    route: RouteFn,
}

impl RequestLoggingLayer {
    /// Layer with auto-logging and client IP capture enabled.
    ///
    /// The peer address is read from a `SocketAddr` request extension; the span
    /// `path` is the request URI path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            auto_logging: true,
            forwarded_ip: true,
            peer_addr: socket_addr_extension,
            route: no_route,
        }
    }

    /// Toggle the completion events.
    #[must_use]
    pub const fn with_auto_logging(mut self, enabled: bool) -> Self {
        self.auto_logging = enabled;
        self
    }

    /// Toggle the `ip` span field.
    #[must_use]
    pub const fn with_forwarded_ip(mut self, enabled: bool) -> Self {
        self.forwarded_ip = enabled;
        self
    }

    /// Replace the peer address lookup.
    #[must_use]
    pub const fn with_peer_addr(mut self, peer_addr: PeerAddrFn) -> Self {
        self.peer_addr = peer_addr;
        self
    }

    /// Replace the route lookup used for the span `path`.
    #[must_use]
    pub const fn with_route(mut self, route: RouteFn) -> Self {
        self.route = route;
        self
    }

    /// Whether completion events are emitted.
    #[must_use]
    pub const fn auto_logging(&self) -> bool {
        self.auto_logging
    }

    /// Whether the `ip` span field is recorded.
    #[must_use]
    pub const fn forwarded_ip(&self) -> bool {
        self.forwarded_ip
    }
}

impl Default for RequestLoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService {
            inner,
            layer: *self,
        }
    }
}

/// Service produced by [`RequestLoggingLayer`].
#[derive(Debug, Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
    layer: RequestLoggingLayer,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let path = (self.layer.route)(request.extensions())
            .unwrap_or_else(|| request.uri().path().to_string());
        let span = info_span!(
            "http.request",
            method = %request.method(),
            path = %path,
            request_id = Empty,
            ip = Empty,
        );
        if let Some(request_id) = request
            .headers()
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
        {
            span.record("request_id", request_id);
        }
        if self.layer.forwarded_ip
            && let Some(ip) = client_ip(request.headers(), (self.layer.peer_addr)(request.extensions()))
        {
            span.record("ip", ip.as_str());
        }

        let auto_logging = self.layer.auto_logging;
        let started = Instant::now();
        let future = {
            let _entered = span.enter();
            self.inner.call(request)
        };

        Box::pin(
            async move {
                let result = future.await;
                if auto_logging {
                    log_completion(&result, elapsed_ms(started));
                }
                result
            }
            .instrument(span),
        )
    }
}

fn log_completion<B, E: Display>(result: &Result<Response<B>, E>, response_time_ms: u64) {
    match result {
        Ok(response) if response.status().is_server_error() => {
            let status = response.status().as_u16();
            let error = format!("failed with status code {status}");
            error!(
                status,
                response_time_ms,
                error = error.as_str(),
                "request errored"
            );
        }
        Ok(response) => {
            info!(
                status = response.status().as_u16(),
                response_time_ms, "request completed"
            );
        }
        Err(err) => {
            error!(error = %err, response_time_ms, "request errored");
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn socket_addr_extension(extensions: &Extensions) -> Option<SocketAddr> {
    extensions.get::<SocketAddr>().copied()
}

const fn no_route(_: &Extensions) -> Option<String> {
    None
}
