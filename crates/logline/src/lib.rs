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

//! Structured logging setup shared by services.
//!
//! Layout: `env.rs` (environment snapshot), `level.rs`/`format.rs`/`base.rs`
//! (resolvers), `config.rs` (options and resolved config), `logfmt.rs` (logfmt
//! line formatter), `transport.rs` (record-stream writers), `layer.rs` and
//! `init.rs` (`tracing` integration).

pub mod base;
pub mod config;
pub mod env;
pub mod error;
pub mod format;
pub mod init;
pub mod layer;
pub mod level;
pub mod logfmt;
pub mod transport;

pub use base::{BaseFields, resolve_base};
pub use config::{LoggerOptions, LoggingConfig, TimeFormat};
pub use env::EnvSnapshot;
pub use error::{LoggingError, LoggingResult};
pub use format::{FormatSelector, LogFormat, resolve_flatten_nested, resolve_log_format};
pub use init::{BoxedSubscriber, build_subscriber, create_logger, init_logging};
pub use layer::{RecordEncoding, RecordLayer};
pub use level::{LogLevel, resolve_log_level};
pub use logfmt::{LogfmtFormatter, LogfmtOptions, Record, flatten, reorder, stringify};
pub use transport::{
    DEFAULT_PIPE_CAPACITY, LogfmtPipe, LogfmtProducer, LogfmtTransport, run_logfmt_stream,
    spawn_logfmt_transport,
};
