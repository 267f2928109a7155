//! Destinations for finished access-log lines.

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives one complete, newline-terminated line per request.
///
/// Called concurrently from every in-flight request, with no
/// serialization on the caller's side. A sink over a non-thread-safe writer
/// has to bring its own; [`Mutex<W>`] is provided for that.
pub trait Sink: Send + Sync + 'static {
    fn write_line(&self, line: &[u8]) -> io::Result<()>;
}

impl Sink for io::Stdout {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }
}

impl Sink for io::Stderr {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lock().write_all(line)
    }
}

/// Lines go straight to the file descriptor. Open it with
/// [`OpenOptions::append`](std::fs::OpenOptions::append) so concurrent
/// lines never interleave.
impl Sink for File {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut file: &File = self;
        file.write_all(line)
    }
}

impl Sink for io::Sink {
    fn write_line(&self, _line: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Serializes writes to any [`Write`]r. A poisoned lock is recovered: a
/// panic elsewhere does not stop access logging.
impl<W: Write + Send + 'static> Sink for Mutex<W> {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lock().unwrap_or_else(PoisonError::into_inner).write_all(line)
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        (**self).write_line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutex_sink_collects_lines() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        sink.write_line(b"one\n").unwrap();
        sink.write_line(b"two\n").unwrap();
        assert_eq!(*sink.lock().unwrap(), b"one\ntwo\n");
    }

    #[test]
    fn mutex_sink_survives_poisoning() {
        let sink = Arc::new(Mutex::new(Vec::new()));
        let poisoner = Arc::clone(&sink);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(sink.is_poisoned());
        sink.write_line(b"still logging\n").unwrap();
        assert_eq!(*sink.lock().unwrap_or_else(PoisonError::into_inner), b"still logging\n");
    }

    #[test]
    fn discard_sink_accepts_everything() {
        assert!(io::sink().write_line(b"gone\n").is_ok());
    }
}
