//! Handler trait and type erasure.
//!
//! # How handlers are called
//!
//! A handler borrows the request and the response writer for the duration
//! of one call and returns a future tied to those borrows:
//!
//! ```text
//! handler_fn(|req, res| Box::pin(async move { … }))   ← user writes this
//!        ↓
//! HandlerFn(closure)                                  ← implements Handler
//!        ↓  AccessLog::wrap(handler)
//! Logged { next: HandlerFn(closure), log }            ← also a Handler
//!        ↓  stored as Arc<dyn Handler> by the server
//! handler.call(&req, &mut writer)  at request time    ← one vtable dispatch
//! ```
//!
//! Borrowing instead of moving is what lets middleware hand the next
//! handler a *decorated* writer (`&mut ResponseObserver`) and read the
//! observation back afterwards, without any shared state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated, type-erased future borrowing from one handler call.
///
/// `Pin<Box<…>>` lets the runtime poll the future in place; `Send` lets
/// tokio move it across worker threads.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Implemented by everything that can answer a request: plain handlers made
/// with [`handler_fn`] and handlers decorated by middleware.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call<'a>(&'a self, req: &'a Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (**self).call(req, res)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call<'a>(&'a self, req: &'a Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (**self).call(req, res)
    }
}

// ── Closure adapter ───────────────────────────────────────────────────────────

/// Turns a closure into a [`Handler`].
///
/// The bound sits on this function, not on a blanket impl, so the compiler
/// can infer the closure's higher-ranked signature at the call site:
///
/// ```rust
/// use linelog::handler_fn;
///
/// let hello = handler_fn(|_req, res| {
///     Box::pin(async move {
///         res.set_status(200);
///         let _ = res.write(b"hello");
///     })
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a> + Send + Sync + 'static,
{
    HandlerFn(f)
}

/// Closure-backed handler. Obtain via [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F>(F);

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a Request, res: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        (self.0)(req, res)
    }
}
