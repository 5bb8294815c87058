//! Record-stream transports that write one logfmt line per record.
//!
//! # Design
//! - Records are processed strictly one at a time, in arrival order.
//! - Each line is written with a single `write_all` so lines never interleave.
//! - Sink failures are returned to the caller; a dropped line is data loss.
//! - The queued variant bounds its buffer, so producers wait instead of piling up records.

use std::io::Write;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::{LoggingError, LoggingResult};
use crate::logfmt::{LogfmtFormatter, LogfmtOptions, Record};

/// Default number of records the queued transport accepts before producers wait.
pub const DEFAULT_PIPE_CAPACITY: usize = 1_024;

/// Synchronous transport owning its sink.
#[derive(Debug)]
pub struct LogfmtTransport<W> {
    formatter: LogfmtFormatter,
    sink: W,
}

impl<W: Write> LogfmtTransport<W> {
    /// Build a transport writing to `sink`.
    #[must_use]
    pub const fn new(options: LogfmtOptions, sink: W) -> Self {
        Self {
            formatter: LogfmtFormatter::new(options),
            sink,
        }
    }

    /// Format one record and write it followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::SinkWrite`] if the sink rejects the line.
    pub fn write_record(&mut self, record: Record) -> LoggingResult<()> {
        let line = formatted_line(&self.formatter, record);
        self.sink
            .write_all(line.as_bytes())
            .map_err(|source| LoggingError::sink("logfmt.write_record", source))
    }

    /// Write every record in order, then flush.
    ///
    /// # Errors
    ///
    /// Stops at the first sink failure and returns it.
    pub fn run<I>(&mut self, records: I) -> LoggingResult<()>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.write_record(record)?;
        }
        self.flush()
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::SinkWrite`] if flushing fails.
    pub fn flush(&mut self) -> LoggingResult<()> {
        self.sink
            .flush()
            .map_err(|source| LoggingError::sink("logfmt.flush", source))
    }

    /// Release the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Drain `records` into `sink`, one line per record, and flush once the stream ends.
///
/// The next record is not polled until the previous line is fully written.
///
/// # Errors
///
/// Returns the first sink failure; remaining records are not consumed.
pub async fn run_logfmt_stream<S, W>(
    options: LogfmtOptions,
    records: S,
    mut sink: W,
) -> LoggingResult<W>
where
    S: Stream<Item = Record>,
    W: AsyncWrite + Unpin,
{
    let formatter = LogfmtFormatter::new(options);
    let mut records = std::pin::pin!(records);
    while let Some(record) = records.next().await {
        let line = formatted_line(&formatter, record);
        sink.write_all(line.as_bytes())
            .await
            .map_err(|source| LoggingError::sink("logfmt.stream_write", source))?;
    }
    sink.flush()
        .await
        .map_err(|source| LoggingError::sink("logfmt.stream_flush", source))?;
    Ok(sink)
}

/// Producer handle for a queued transport.
pub type LogfmtProducer = mpsc::Sender<Record>;

/// Bounded record queue with a single background writer owning the sink.
#[derive(Debug)]
pub struct LogfmtPipe<W> {
    sender: LogfmtProducer,
    task: JoinHandle<LoggingResult<W>>,
}

/// Spawn a background writer fed through a queue of `capacity` records.
///
/// Must be called from within a Tokio runtime.
#[must_use]
pub fn spawn_logfmt_transport<W>(options: LogfmtOptions, sink: W, capacity: usize) -> LogfmtPipe<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(run_logfmt_stream(
        options,
        ReceiverStream::new(receiver),
        sink,
    ));
    LogfmtPipe { sender, task }
}

impl<W> LogfmtPipe<W> {
    /// Another producer feeding the same queue.
    #[must_use]
    pub fn producer(&self) -> LogfmtProducer {
        self.sender.clone()
    }

    /// Queue a record, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::TransportClosed`] once the writer has stopped, for
    /// example after a sink failure; [`LogfmtPipe::finish`] reports the cause.
    pub async fn send(&self, record: Record) -> LoggingResult<()> {
        self.sender
            .send(record)
            .await
            .map_err(|_| LoggingError::TransportClosed)
    }

    /// Close the queue and wait until every accepted record is written and flushed.
    ///
    /// Producers obtained through [`LogfmtPipe::producer`] must be dropped first,
    /// otherwise this waits for them.
    ///
    /// # Errors
    ///
    /// Returns the sink failure that stopped the writer, or
    /// [`LoggingError::TransportTask`] if the writer task did not complete.
    pub async fn finish(self) -> LoggingResult<W> {
        let Self { sender, task } = self;
        drop(sender);
        task.await
            .map_err(|source| LoggingError::TransportTask { source })?
    }
}

fn formatted_line(formatter: &LogfmtFormatter, record: Record) -> String {
    let mut line = formatter.format_record(record);
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use logline_test_support::record;
    use serde_json::json;
    use std::io;

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn transport_writes_one_line_per_record() -> LoggingResult<()> {
        let mut transport = LogfmtTransport::new(LogfmtOptions::default(), Vec::new());
        transport.run([
            record(json!({"msg": "first", "level": "INFO"})),
            record(json!({"msg": "second", "time": 2})),
        ])?;
        let output = String::from_utf8_lossy(&transport.into_inner()).to_string();
        assert_eq!(output, "level=INFO msg=first\ntime=2 msg=second\n");
        Ok(())
    }

    #[test]
    fn transport_propagates_sink_failures() {
        let mut transport = LogfmtTransport::new(LogfmtOptions::default(), BrokenSink);
        let result = transport.write_record(record(json!({"msg": "lost"})));
        assert!(matches!(
            result,
            Err(LoggingError::SinkWrite {
                operation: "logfmt.write_record",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn stream_transport_preserves_order() -> LoggingResult<()> {
        let records = (0..5).map(|seq| record(json!({"seq": seq})));
        let sink = run_logfmt_stream(
            LogfmtOptions::default(),
            tokio_stream::iter(records),
            Vec::new(),
        )
        .await?;
        let output = String::from_utf8_lossy(&sink).to_string();
        assert_eq!(output, "seq=0\nseq=1\nseq=2\nseq=3\nseq=4\n");
        Ok(())
    }

    #[tokio::test]
    async fn pipe_flushes_accepted_records_on_finish() -> LoggingResult<()> {
        let pipe = spawn_logfmt_transport(
            LogfmtOptions {
                flatten_nested_objects: true,
                ..LogfmtOptions::default()
            },
            Vec::new(),
            1,
        );
        for seq in 0..10 {
            pipe.send(record(json!({"msg": "tick", "ctx": {"seq": seq}})))
                .await?;
        }
        let sink = pipe.finish().await?;
        let output = String::from_utf8_lossy(&sink).to_string();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines.first().copied(), Some("msg=tick ctx_seq=0"));
        assert_eq!(lines.last().copied(), Some("msg=tick ctx_seq=9"));
        Ok(())
    }
}
