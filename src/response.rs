//! The response-writing interface handlers produce their output through,
//! and the buffered implementation the bundled server hands them.
//!
//! Handlers do not return a response value. They set a status, touch
//! headers and write body bytes through a [`ResponseWriter`], in any order
//! the protocol allows. That is what lets middleware sit between a handler
//! and the transport and observe exactly what was sent.

use std::io;

use bytes::Bytes;
use http::HeaderMap;
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// Write side of one HTTP exchange.
///
/// Status codes are plain `u16` so a writer can carry whatever a handler
/// asks for; the transport decides what is valid on the wire.
pub trait ResponseWriter: Send {
    /// Response headers. Changes after the first body write may be ignored
    /// by streaming transports.
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Emits the status line.
    fn set_status(&mut self, status: u16);

    /// Writes body bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Flush capability, if this writer has one.
    ///
    /// Callers query this once and get `None` from writers that cannot push
    /// partial output early (for example a fully buffered response).
    fn flusher(&mut self) -> Option<&mut dyn Flush> {
        None
    }
}

/// Pushes buffered response bytes to the client early.
pub trait Flush {
    fn flush(&mut self);
}

// ── BufferedResponse ──────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that buffers the whole response in memory.
///
/// The first status set wins; later ones are ignored, as on a real
/// connection where only one status line is ever sent. Writing body bytes
/// before setting a status implies `200 OK`.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<u16>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status set so far, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into a hyper-ready response.
    ///
    /// A handler that never set a status answers `200 OK`. Codes outside
    /// `100..=999` cannot go on the wire and become `500`.
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let code = self.status.unwrap_or(200);
        let status = StatusCode::from_u16(code).unwrap_or_else(|_| {
            warn!(code, "handler set an unrepresentable status, sending 500");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers(&self) -> &HeaderMap { &self.headers }
    fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }

    fn set_status(&mut self, status: u16) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(200);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CONTENT_TYPE, HeaderValue};

    #[test]
    fn first_status_wins() {
        let mut res = BufferedResponse::new();
        res.set_status(201);
        res.set_status(404);
        assert_eq!(res.status(), Some(201));
        assert_eq!(res.into_http().status(), StatusCode::CREATED);
    }

    #[test]
    fn write_implies_ok() {
        let mut res = BufferedResponse::new();
        assert_eq!(res.write(b"hello").unwrap(), 5);
        res.set_status(500);
        assert_eq!(res.status(), Some(200));
        assert_eq!(res.body(), b"hello");
    }

    #[test]
    fn untouched_response_is_empty_ok() {
        let res = BufferedResponse::new().into_http();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn unrepresentable_status_becomes_500() {
        let mut res = BufferedResponse::new();
        res.set_status(42);
        assert_eq!(res.into_http().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn headers_are_carried_over() {
        let mut res = BufferedResponse::new();
        res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let res = res.into_http();
        assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn buffered_response_has_no_flusher() {
        let mut res = BufferedResponse::new();
        assert!(res.flusher().is_none());
    }
}
