#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Request logging middleware for Tower-compatible HTTP stacks.
//!
//! Layout: `ip.rs` (client address derivation), `layer.rs` (per-request span and
//! completion events), `request_id.rs` (`x-request-id` layers), `logger.rs`
//! (options and the configured request logger).

pub mod ip;
pub mod layer;
pub mod logger;
pub mod request_id;

pub use ip::{HEADER_FORWARDED_FOR, HEADER_REQUEST_ID, client_ip};
pub use layer::{PeerAddrFn, RequestLoggingLayer, RequestLoggingService, RouteFn};
pub use logger::{RequestLogger, RequestLoggingOptions};
pub use request_id::{propagate_request_id_layer, set_request_id_layer};
