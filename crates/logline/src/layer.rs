//! `tracing` layer that turns events into records and writes one line per event.
//!
//! # Design
//! - Span fields are captured when a span is created or recorded and stored in its extensions.
//! - Record field order: `time`, `level`, `name`, base fields, span fields (outermost first),
//!   event fields, `msg`.
//! - Each line is written with one `write_all`; writer failures go to stderr because
//!   layer callbacks cannot return errors.
//! - `tracing` field values are scalars, so logfmt flattening never changes event
//!   lines here; it only matters for records fed to the transports.
//! - A span field named `message` is kept as an ordinary field; only the event
//!   message becomes `msg`.

use std::fmt;
use std::io::Write;

use chrono::Utc;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record as SpanValues};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::config::{LoggingConfig, TimeFormat};
use crate::format::LogFormat;
use crate::logfmt::{LogfmtFormatter, Record};

const FIELD_TIME: &str = "time";
const FIELD_LEVEL: &str = "level";
const FIELD_NAME: &str = "name";
const FIELD_MSG: &str = "msg";
const MESSAGE_FIELD: &str = "message";

/// Line encoding applied to each record.
#[derive(Debug, Clone)]
pub enum RecordEncoding {
    /// Compact JSON object per line.
    Json,
    /// Logfmt line produced by the given formatter.
    Logfmt(LogfmtFormatter),
}

impl RecordEncoding {
    /// Encode a record as a single line without the trailing newline.
    #[must_use]
    pub fn encode(&self, record: Record) -> String {
        match self {
            Self::Json => Value::Object(record).to_string(),
            Self::Logfmt(formatter) => formatter.format_record(record),
        }
    }
}

/// Layer writing structured records through a [`MakeWriter`].
pub struct RecordLayer<W> {
    make_writer: W,
    encoding: RecordEncoding,
    name: Option<String>,
    base: Record,
    time_format: TimeFormat,
}

impl<W> RecordLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    /// Build a layer from a resolved configuration.
    ///
    /// `json` selects JSON encoding and `logfmt` selects logfmt with the configured
    /// flattening. `pretty` has no record encoding of its own: `build_subscriber`
    /// uses the fmt layer for it, and a layer built here from a pretty
    /// configuration falls back to logfmt. Use [`RecordLayer::with_encoding`] to
    /// pick the encoding explicitly.
    #[must_use]
    pub fn new(config: &LoggingConfig, make_writer: W) -> Self {
        let encoding = match config.format {
            LogFormat::Json => RecordEncoding::Json,
            LogFormat::Logfmt | LogFormat::Pretty => {
                RecordEncoding::Logfmt(LogfmtFormatter::new(config.logfmt_options()))
            }
        };
        Self {
            make_writer,
            encoding,
            name: config.name.clone(),
            base: config.base.entries(),
            time_format: config.time_format,
        }
    }

    /// Replace the line encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: RecordEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The active line encoding.
    #[must_use]
    pub const fn encoding(&self) -> &RecordEncoding {
        &self.encoding
    }

    fn build_record<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> Record
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let mut record = Record::new();
        record.insert(FIELD_TIME.to_string(), self.time_format.render(Utc::now()));
        record.insert(
            FIELD_LEVEL.to_string(),
            Value::from(event.metadata().level().as_str()),
        );
        if let Some(name) = &self.name {
            record.insert(FIELD_NAME.to_string(), Value::from(name.as_str()));
        }
        record.extend(self.base.clone());

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(fields)) = span.extensions().get::<SpanFields>() {
                    record.extend(fields.clone());
                }
            }
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        record.extend(visitor.fields);
        if let Some(message) = visitor.message {
            record.insert(FIELD_MSG.to_string(), Value::from(message));
        }
        record
    }
}

impl<W> fmt::Debug for RecordLayer<W> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RecordLayer")
            .field("encoding", &self.encoding)
            .field("name", &self.name)
            .field("base", &self.base)
            .field("time_format", &self.time_format)
            .finish_non_exhaustive()
    }
}

impl<S, W> Layer<S> for RecordLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = RecordVisitor::for_span(Record::new());
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.fields));
    }

    fn on_record(&self, id: &Id, values: &SpanValues<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
            let mut visitor = RecordVisitor::for_span(std::mem::take(fields));
            values.record(&mut visitor);
            *fields = visitor.fields;
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let record = self.build_record(event, &ctx);
        let mut line = self.encoding.encode(record);
        line.push('\n');
        let mut writer = self.make_writer.make_writer_for(event.metadata());
        if let Err(err) = writer.write_all(line.as_bytes()) {
            eprintln!("failed to write log line: {err}");
        }
    }
}

struct SpanFields(Record);

#[derive(Default)]
struct RecordVisitor {
    fields: Record,
    message: Option<String>,
    keep_message_field: bool,
}

impl RecordVisitor {
    const fn for_span(fields: Record) -> Self {
        Self {
            fields,
            message: None,
            keep_message_field: true,
        }
    }

    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    fn is_event_message(&self, field: &Field) -> bool {
        !self.keep_message_field && field.name() == MESSAGE_FIELD
    }
}

impl Visit for RecordVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if self.is_event_message(field) {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if self.is_event_message(field) {
            self.message = Some(text);
        } else {
            self.insert(field, Value::from(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggerOptions;
    use crate::env::EnvSnapshot;
    use logline_test_support::{CaptureWriter, record};
    use serde_json::json;
    use std::io;
    use tracing_subscriber::layer::SubscriberExt;

    fn config(pairs: &[(&str, &str)]) -> LoggingConfig {
        LoggingConfig::resolve(
            &LoggerOptions::default(),
            &EnvSnapshot::from_vars(pairs.iter().copied()),
        )
    }

    #[test]
    fn json_format_selects_json_encoding() {
        let layer = RecordLayer::new(&config(&[("LOG_FORMAT", "json")]), io::sink);
        assert!(matches!(layer.encoding(), RecordEncoding::Json));
    }

    #[test]
    fn logfmt_encoding_follows_flatten_toggle() {
        let layer = RecordLayer::new(
            &config(&[("LOG_FORMAT", "logfmt"), ("LOG_FLATTEN_NESTED", "false")]),
            io::sink,
        );
        match layer.encoding() {
            RecordEncoding::Logfmt(formatter) => {
                assert!(!formatter.options().flatten_nested_objects);
            }
            RecordEncoding::Json => panic!("expected logfmt encoding"),
        }
    }

    #[test]
    fn json_encoding_keeps_field_order() {
        let line = RecordEncoding::Json.encode(record(json!({"msg": "hi", "level": "INFO"})));
        assert_eq!(line, r#"{"msg":"hi","level":"INFO"}"#);
    }

    #[test]
    fn logfmt_encoding_reorders_priority_fields() {
        let encoding = RecordEncoding::Logfmt(LogfmtFormatter::default());
        let line = encoding.encode(record(json!({"user": "ada", "msg": "hi", "level": "INFO"})));
        assert_eq!(line, "level=INFO msg=hi user=ada");
    }

    #[test]
    fn pretty_configuration_falls_back_to_logfmt() {
        let layer = RecordLayer::new(&config(&[("LOG_FORMAT", "pretty")]), io::sink);
        assert!(matches!(layer.encoding(), RecordEncoding::Logfmt(_)));
    }

    #[test]
    fn explicit_encoding_replaces_the_configured_one() {
        let capture = CaptureWriter::new();
        let layer = RecordLayer::new(&config(&[("LOG_FORMAT", "logfmt")]), capture.clone())
            .with_encoding(RecordEncoding::Json);
        assert!(matches!(layer.encoding(), RecordEncoding::Json));

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(order = 7_u64, "placed");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        let line = lines.first().map(String::as_str).unwrap_or_default();
        assert!(line.starts_with("{\"time\":"));
        assert!(line.ends_with(r#""level":"INFO","order":7,"msg":"placed"}"#));
    }

    #[test]
    fn span_message_fields_stay_on_the_record() {
        let capture = CaptureWriter::new();
        let subscriber = tracing_subscriber::registry()
            .with(RecordLayer::new(&config(&[("LOG_FORMAT", "logfmt")]), capture.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("job", message = "nightly", attempt = 1_u64);
            let _entered = span.enter();
            tracing::info!("run");
        });

        let lines = capture.lines();
        let line = lines.first().map(String::as_str).unwrap_or_default();
        assert!(line.ends_with("level=INFO msg=run message=nightly attempt=1"));
    }

    #[test]
    fn omitted_base_fields_stay_out_of_the_layer() {
        let layer = RecordLayer::new(&config(&[]), io::sink);
        assert!(layer.base.is_empty());
        let layer = RecordLayer::new(&config(&[("LOG_OMIT_FIELDS", "hostname")]), io::sink);
        assert!(layer.base.contains_key("pid"));
        assert!(!layer.base.contains_key("hostname"));
    }
}
