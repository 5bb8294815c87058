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

//! Logger module for axum applications.
//!
//! Layout: `module.rs` (options, `LoggerModule`, axum extension lookups).

pub mod module;

pub use module::{LoggerModule, LoggerModuleOptions};
