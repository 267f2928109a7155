//! Field extractors.
//!
//! One function per log field. Each appends its value and the `" | "`
//! delimiter to a [`Line`]; the caller runs them in the order of the line
//! format. None of them allocates: integers go through `itoa`, timestamps
//! and durations are formatted straight into the line buffer, and string
//! values are sanitized through a pooled scratch buffer.

use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};

use super::observer::Observation;
use super::tls;
use crate::pool::{ESCAPE_CAPACITY, EscapeBuf, Pool};
use crate::request::Request;

pub(crate) const DELIMITER: &[u8] = b" | ";

const PIPE: u8 = b'|';
const PLACEHOLDER: u8 = b'-';
const SUB_MILLISECOND: &[u8] = b"0.000";

/// Decoded Basic credentials larger than this log as `-`.
const CREDENTIALS_CAPACITY: usize = 0x200;

/// When a request started, on both clocks: local wall time (with the
/// offset in effect at that moment) for the access time field, monotonic
/// time for the duration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Started {
    pub(crate) at: DateTime<FixedOffset>,
    pub(crate) instant: Instant,
}

impl Started {
    pub(crate) fn now() -> Self {
        Self { at: Local::now().fixed_offset(), instant: Instant::now() }
    }
}

// ── Line accumulator ──────────────────────────────────────────────────────────

/// A log line under construction.
pub(crate) struct Line<'a> {
    buf: &'a mut Vec<u8>,
    scratch: &'a Pool<EscapeBuf>,
}

impl<'a> Line<'a> {
    pub(crate) fn new(buf: &'a mut Vec<u8>, scratch: &'a Pool<EscapeBuf>) -> Self {
        Self { buf, scratch }
    }

    fn end_field(&mut self) {
        self.buf.extend_from_slice(DELIMITER);
    }

    fn raw(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
        self.end_field();
    }

    fn escaped(&mut self, value: &[u8]) {
        escape_into(self.buf, self.scratch, value);
        self.end_field();
    }

    fn placeholder(&mut self) {
        self.buf.push(PLACEHOLDER);
        self.end_field();
    }

    fn integer(&mut self, value: impl itoa::Integer) {
        let mut fmt = itoa::Buffer::new();
        self.raw(fmt.format(value).as_bytes());
    }

    fn escaped_or_placeholder(&mut self, value: Option<&[u8]>) {
        match value {
            Some(v) => self.escaped(v),
            None => self.placeholder(),
        }
    }

    fn name_or_placeholder(&mut self, name: Option<&str>) {
        match name {
            Some(n) => self.raw(n.as_bytes()),
            None => self.placeholder(),
        }
    }

    /// Replaces the trailing delimiter with a newline and returns the
    /// finished line.
    pub(crate) fn finish(self) -> &'a [u8] {
        let buf = self.buf;
        let n = buf.len() - DELIMITER.len();
        buf[n] = b'\n';
        &buf[..=n]
    }
}

// ── Escaping ──────────────────────────────────────────────────────────────────

/// Bytes that may appear verbatim inside a field.
pub(crate) fn is_loggable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b) && b != PIPE
}

/// Appends at most [`ESCAPE_CAPACITY`] bytes of `src` to `out`, with every
/// byte that is not printable ASCII, or is the delimiter pipe, replaced by
/// `.`. The rest of `src` is dropped.
pub(crate) fn escape_into(out: &mut Vec<u8>, pool: &Pool<EscapeBuf>, src: &[u8]) {
    let mut scratch = pool.get();
    let n = src.len().min(ESCAPE_CAPACITY);
    let window = &mut scratch.0[..n];
    window.copy_from_slice(&src[..n]);
    for b in window.iter_mut() {
        if !is_loggable(*b) {
            *b = b'.';
        }
    }
    out.extend_from_slice(window);
}

// ── Extractors ────────────────────────────────────────────────────────────────

/// `$time_iso8601`: RFC 3339 at second precision, `Z` for a zero offset.
pub(crate) fn access_time(line: &mut Line<'_>, started: &Started) {
    let at = &started.at;
    let offset = at.offset().local_minus_utc();
    // Writing into a Vec cannot fail.
    let _ = write!(
        line.buf,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        at.year(), at.month(), at.day(), at.hour(), at.minute(), at.second(),
    );
    if offset == 0 {
        line.buf.push(b'Z');
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let offset = offset.unsigned_abs();
        let _ = write!(line.buf, "{sign}{:02}:{:02}", offset / 3600, offset / 60 % 60);
    }
    line.end_field();
}

/// `$remote_addr`: the peer address without its port.
pub(crate) fn remote_addr(line: &mut Line<'_>, req: &Request) {
    let addr = req.remote_addr();
    let host = match addr.rfind(':') {
        Some(i) => &addr[..i],
        None => addr,
    };
    line.escaped(host.as_bytes());
}

/// `$remote_user`: the Basic auth user name.
pub(crate) fn remote_user(line: &mut Line<'_>, req: &Request) {
    let mut credentials = [0u8; CREDENTIALS_CAPACITY];
    line.escaped_or_placeholder(req.basic_auth_user(&mut credentials));
}

/// `$request`: method, path and protocol. Extension methods may contain
/// `|`, so the method is escaped along with the path.
pub(crate) fn request_line(line: &mut Line<'_>, req: &Request) {
    escape_into(line.buf, line.scratch, req.method().as_str().as_bytes());
    line.buf.push(b' ');
    escape_into(line.buf, line.scratch, req.path().as_bytes());
    line.buf.push(b' ');
    line.raw(req.protocol().as_bytes());
}

/// `$status`: `0` when the handler never wrote anything.
pub(crate) fn status(line: &mut Line<'_>, seen: &Observation) {
    line.integer(seen.status.unwrap_or(0));
}

fn header(line: &mut Line<'_>, req: &Request, name: &str) {
    line.escaped_or_placeholder(req.headers().get(name).map(|v| v.as_bytes()));
}

/// `$http_referer`
pub(crate) fn referer(line: &mut Line<'_>, req: &Request) {
    header(line, req, "referer");
}

/// `$http_x_forwarded_for`
pub(crate) fn forwarded_for(line: &mut Line<'_>, req: &Request) {
    header(line, req, "x-forwarded-for");
}

/// `$http_user_agent`
pub(crate) fn user_agent(line: &mut Line<'_>, req: &Request) {
    header(line, req, "user-agent");
}

/// `$ssl_protocol`
pub(crate) fn tls_protocol(line: &mut Line<'_>, req: &Request) {
    line.name_or_placeholder(req.tls().and_then(|t| tls::protocol_name(t.version)));
}

/// `$ssl_cipher`
pub(crate) fn tls_cipher(line: &mut Line<'_>, req: &Request) {
    line.name_or_placeholder(req.tls().and_then(|t| tls::cipher_name(t.cipher_suite)));
}

/// `$bytes_sent`
pub(crate) fn bytes_sent(line: &mut Line<'_>, seen: &Observation) {
    line.integer(seen.bytes_sent);
}

/// `$request_time`: seconds with millisecond resolution.
pub(crate) fn request_time(line: &mut Line<'_>, started: &Started) {
    request_time_from(line, started.instant.elapsed());
}

fn request_time_from(line: &mut Line<'_>, elapsed: Duration) {
    if elapsed < Duration::from_millis(1) {
        line.raw(SUB_MILLISECOND);
        return;
    }
    let _ = write!(line.buf, "{:.3}", elapsed.as_secs_f64());
    line.end_field();
}

/// `$http_x_request_id`
pub(crate) fn request_id(line: &mut Line<'_>, req: &Request) {
    header(line, req, "x-request-id");
}
