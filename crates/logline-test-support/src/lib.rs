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

//! Shared test helpers used across integration suites.
//! Layout: capture.rs (in-memory log writer), records.rs (record literals), sinks.rs (failing sinks).

pub mod capture;
pub mod records;
pub mod sinks;

pub use capture::CaptureWriter;
pub use records::record;
pub use sinks::FailingSink;
