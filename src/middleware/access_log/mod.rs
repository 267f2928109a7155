//! Fixed-format access log.
//!
//! One line per request, fields separated by `" | "`:
//!
//! ```text
//! <time> | <remote-ip> | <user> | <METHOD> <path> <PROTO> | <status> | <referer> | <x-forwarded-for> | <user-agent> | <tls-version> | <tls-cipher> | <bytes-sent> | <seconds> | <x-request-id>
//! ```
//!
//! ```text
//! 2019-09-01T10:05:03+02:00 | 203.0.113.5 | - | GET /users/42 HTTP/1.1 | 200 | - | - | curl/8.5.0 | TLSv1.3 | AES128-GCM-SHA256 | 27 | 0.004 | 7f3a9c
//! ```
//!
//! Missing values print as `-`. String values are cut to 128 bytes and
//! every byte outside printable ASCII, and every `|`, prints as `.`, so a
//! line is always exactly one line and always splits into 13 fields.
//!
//! The format is fixed. There is no format string and no field selection.
//!
//! # Hot path
//!
//! Building a line does not allocate. The line and the per-field scratch
//! space come from lock-free buffer pools owned by the [`AccessLog`] and
//! shared by every handler it wraps; buffers go back when the request is
//! done, unwinding included.

mod fields;
mod observer;
pub mod tls;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::handler::{BoxFuture, Handler};
use crate::pool::{EscapeBuf, LineBuf, Pool};
use crate::request::Request;
use crate::response::ResponseWriter;
use crate::sink::Sink;

use self::fields::{Line, Started};
use self::observer::{Observation, ResponseObserver};

type ErrorHook = Box<dyn Fn(&io::Error) + Send + Sync + 'static>;

/// Access-log middleware. Bind a sink once, then [`wrap`](AccessLog::wrap)
/// as many handlers as needed; they all log to that sink.
///
/// ```rust
/// use linelog::{AccessLog, handler_fn};
///
/// let log = AccessLog::new(std::io::stdout());
/// let app = log.wrap(handler_fn(|_req, res| {
///     Box::pin(async move {
///         let _ = res.write(b"hello");
///     })
/// }));
/// # let _ = app;
/// ```
///
/// Logging never affects the response. A line the sink refuses is dropped,
/// counted in [`dropped_lines`](AccessLog::dropped_lines) and handed to the
/// error hook (see [`AccessLogBuilder::on_error`]), which by default emits a
/// `tracing` warning.
#[derive(Clone)]
pub struct AccessLog {
    shared: Arc<Shared>,
}

struct Shared {
    sink: Box<dyn Sink>,
    on_error: Option<ErrorHook>,
    dropped: AtomicU64,
    lines: Pool<LineBuf>,
    scratch: Pool<EscapeBuf>,
}

impl AccessLog {
    /// An access log writing to `sink` with default error handling.
    pub fn new(sink: impl Sink) -> Self {
        Self::builder(sink).build()
    }

    pub fn builder(sink: impl Sink) -> AccessLogBuilder {
        AccessLogBuilder { sink: Box::new(sink), on_error: None }
    }

    /// Lines lost to sink failures since this log was built.
    pub fn dropped_lines(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Decorates `next` so every request it serves is logged.
    pub fn wrap<H: Handler>(&self, next: H) -> Logged<H> {
        Logged { next, log: self.clone() }
    }

    fn emit(&self, req: &Request, seen: &Observation, started: &Started) {
        let shared = &*self.shared;
        let mut buf = shared.lines.get();
        let mut line = Line::new(&mut buf.0, &shared.scratch);

        fields::access_time(&mut line, started);
        fields::remote_addr(&mut line, req);
        fields::remote_user(&mut line, req);
        fields::request_line(&mut line, req);
        fields::status(&mut line, seen);
        fields::referer(&mut line, req);
        fields::forwarded_for(&mut line, req);
        fields::user_agent(&mut line, req);
        fields::tls_protocol(&mut line, req);
        fields::tls_cipher(&mut line, req);
        fields::bytes_sent(&mut line, seen);
        fields::request_time(&mut line, started);
        fields::request_id(&mut line, req);

        if let Err(e) = shared.sink.write_line(line.finish()) {
            shared.dropped.fetch_add(1, Ordering::Relaxed);
            match &shared.on_error {
                Some(hook) => hook(&e),
                None => warn!(target: "linelog::access_log", error = %e, "access log line dropped"),
            }
        }
    }
}

/// Configures an [`AccessLog`]. Obtain via [`AccessLog::builder`].
pub struct AccessLogBuilder {
    sink: Box<dyn Sink>,
    on_error: Option<ErrorHook>,
}

impl AccessLogBuilder {
    /// Replaces the default sink-failure handling (a `tracing` warning).
    ///
    /// The hook runs on the request's task right after the failed write,
    /// once the handler has finished, so it must not block.
    pub fn on_error(mut self, hook: impl Fn(&io::Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> AccessLog {
        AccessLog {
            shared: Arc::new(Shared {
                sink: self.sink,
                on_error: self.on_error,
                dropped: AtomicU64::new(0),
                lines: Pool::new(),
                scratch: Pool::new(),
            }),
        }
    }
}

/// A handler with access logging attached. Obtain via [`AccessLog::wrap`].
pub struct Logged<H> {
    next: H,
    log: AccessLog,
}

impl<H: Handler> Handler for Logged<H> {
    fn call<'a>(&'a self, req: &'a Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let started = Started::now();
            let mut observer = ResponseObserver::new(res);
            self.next.call(req, &mut observer).await;
            let seen = observer.observation();
            self.log.emit(req, &seen, &started);
        })
    }
}
