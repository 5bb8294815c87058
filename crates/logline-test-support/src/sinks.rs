//! Sinks that reject every write.

use std::io::{self, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;

/// Sink failing each write with [`io::ErrorKind::BrokenPipe`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSink;

impl FailingSink {
    fn error() -> io::Error {
        io::Error::new(io::ErrorKind::BrokenPipe, "sink closed")
    }
}

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(Self::error())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsyncWrite for FailingSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(Self::error()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_fail_with_broken_pipe() {
        let err = FailingSink.write(b"line").err();
        assert_eq!(err.map(|err| err.kind()), Some(io::ErrorKind::BrokenPipe));
    }
}
