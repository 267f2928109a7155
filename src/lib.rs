//! # linelog
//!
//! Access logging for HTTP services. One fixed-format line per request,
//! built without allocating, written with one call to a sink you choose.
//!
//! ```text
//! 2019-09-01T10:05:03+02:00 | 203.0.113.5 | alice | GET /users/42 HTTP/1.1 | 200 | - | - | curl/8.5.0 | TLSv1.3 | AES128-GCM-SHA256 | 27 | 0.004 | 7f3a9c
//! ```
//!
//! Time, remote address, Basic-auth user, request line, status, referer,
//! `X-Forwarded-For`, user agent, TLS protocol, TLS cipher, bytes sent,
//! seconds taken and `X-Request-Id`, in that order, always. Fields are
//! separated by `" | "`, missing values print as `-`, and values are
//! sanitized so a line is always one line and always splits into 13 fields.
//! Friendly to `grep`, `cut -d'|'` and every log shipper.
//!
//! What linelog does:
//!
//! - [`AccessLog`] — bind a [`Sink`] once, wrap any number of handlers
//! - A response observer that records status and bytes sent without
//!   touching the response
//! - Pooled, reusable buffers for the line and every field
//!
//! What it leaves to you: rotation, shipping, JSON, sampling. Point the sink
//! at a file, stdout, or anything that implements [`Sink`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use linelog::{AccessLog, Request, ResponseWriter, Server, handler_fn};
//!
//! #[tokio::main]
//! async fn main() {
//!     let log = AccessLog::new(std::io::stdout());
//!     let app = log.wrap(handler_fn(|req, res| Box::pin(hello(req, res))));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn hello(req: &Request, res: &mut dyn ResponseWriter) {
//!     if req.path() != "/" {
//!         res.set_status(404);
//!         return;
//!     }
//!     let _ = res.write(b"hello");
//! }
//! ```

mod error;
mod handler;
mod pool;
mod request;
mod response;
mod server;
mod sink;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxFuture, Handler, HandlerFn, handler_fn};
pub use middleware::{AccessLog, AccessLogBuilder, Logged};
pub use request::{Request, RequestBuilder, TlsInfo};
pub use response::{BufferedResponse, Flush, ResponseWriter};
pub use server::Server;
pub use sink::Sink;
