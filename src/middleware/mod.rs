//! Middleware layer.
//!
//! A middleware is a [`Handler`](crate::Handler) that wraps another one.
//! It sees the request before the inner handler does and can substitute the
//! [`ResponseWriter`](crate::ResponseWriter) the inner handler writes to,
//! which is how it observes the response without buffering or altering it.
//!
//! Built-in middleware:
//! - [`access_log`] — one fixed-format line per request to a [`Sink`](crate::Sink)

pub mod access_log;

pub use access_log::{AccessLog, AccessLogBuilder, Logged};
