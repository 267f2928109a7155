//! Response observer: a pass-through [`ResponseWriter`] that remembers what
//! was sent.

use std::io;

use http::HeaderMap;

use crate::response::{Flush, ResponseWriter};

/// What the observer saw during one handler call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Observation {
    /// First status emitted, explicit or implied by a body write.
    pub(crate) status: Option<u16>,
    pub(crate) bytes_sent: u64,
}

/// Wraps the real writer for the duration of one request.
///
/// Every call is forwarded unchanged; the observer only records. It always
/// advertises flush support and forwards the flush when the wrapped writer
/// has it.
pub(crate) struct ResponseObserver<'w> {
    inner: &'w mut dyn ResponseWriter,
    seen: Observation,
}

impl<'w> ResponseObserver<'w> {
    pub(crate) fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self { inner, seen: Observation::default() }
    }

    pub(crate) fn observation(&self) -> Observation {
        self.seen
    }
}

impl ResponseWriter for ResponseObserver<'_> {
    fn headers(&self) -> &HeaderMap { self.inner.headers() }
    fn headers_mut(&mut self) -> &mut HeaderMap { self.inner.headers_mut() }

    fn set_status(&mut self, status: u16) {
        if self.seen.status.is_none() {
            self.seen.status = Some(status);
        }
        self.inner.set_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.seen.status.is_none() {
            self.set_status(200);
        }
        let n = self.inner.write(buf)?;
        self.seen.bytes_sent += n as u64;
        Ok(n)
    }

    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }
}

impl Flush for ResponseObserver<'_> {
    fn flush(&mut self) {
        if let Some(f) = self.inner.flusher() {
            f.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every forwarded call.
    #[derive(Default)]
    struct Recorder {
        headers: HeaderMap,
        statuses: Vec<u16>,
        body: Vec<u8>,
        flushes: usize,
        flushable: bool,
        fail_writes: bool,
    }

    impl ResponseWriter for Recorder {
        fn headers(&self) -> &HeaderMap { &self.headers }
        fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
        fn set_status(&mut self, status: u16) { self.statuses.push(status) }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"));
            }
            // Accept at most 3 bytes per call, like a congested socket.
            let n = buf.len().min(3);
            self.body.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flusher(&mut self) -> Option<&mut dyn Flush> {
            if self.flushable { Some(self) } else { None }
        }
    }

    impl Flush for Recorder {
        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn nothing_written_leaves_no_status() {
        let mut rec = Recorder::default();
        let obs = ResponseObserver::new(&mut rec);
        assert_eq!(obs.observation(), Observation { status: None, bytes_sent: 0 });
    }

    #[test]
    fn first_status_is_recorded_all_are_forwarded() {
        let mut rec = Recorder::default();
        let mut obs = ResponseObserver::new(&mut rec);
        obs.set_status(404);
        obs.set_status(500);
        assert_eq!(obs.observation().status, Some(404));
        drop(obs);
        assert_eq!(rec.statuses, [404, 500]);
    }

    #[test]
    fn write_implies_200_and_counts_accepted_bytes() {
        let mut rec = Recorder::default();
        let mut obs = ResponseObserver::new(&mut rec);
        assert_eq!(obs.write(b"hello").unwrap(), 3);
        assert_eq!(obs.write(b"lo").unwrap(), 2);
        assert_eq!(obs.observation(), Observation { status: Some(200), bytes_sent: 5 });
        drop(obs);
        assert_eq!(rec.statuses, [200]);
        assert_eq!(rec.body, b"hello");
    }

    #[test]
    fn failed_write_is_returned_and_not_counted() {
        let mut rec = Recorder { fail_writes: true, ..Recorder::default() };
        let mut obs = ResponseObserver::new(&mut rec);
        let err = obs.write(b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(obs.observation(), Observation { status: Some(200), bytes_sent: 0 });
    }

    #[test]
    fn flush_is_forwarded_when_supported() {
        let mut rec = Recorder { flushable: true, ..Recorder::default() };
        let mut obs = ResponseObserver::new(&mut rec);
        obs.flusher().expect("observer always flushes").flush();
        drop(obs);
        assert_eq!(rec.flushes, 1);
    }

    #[test]
    fn flush_is_a_no_op_when_unsupported() {
        let mut rec = Recorder::default();
        let mut obs = ResponseObserver::new(&mut rec);
        obs.flusher().expect("observer always flushes").flush();
        drop(obs);
        assert_eq!(rec.flushes, 0);
    }

    #[test]
    fn headers_pass_through() {
        let mut rec = Recorder::default();
        let mut obs = ResponseObserver::new(&mut rec);
        obs.headers_mut().insert("x-trace", http::HeaderValue::from_static("1"));
        assert_eq!(obs.headers()["x-trace"], "1");
        drop(obs);
        assert_eq!(rec.headers["x-trace"], "1");
    }
}
