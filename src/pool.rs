//! Buffer pools for the access-log hot path.
//!
//! A [`Pool`] is an unbounded lock-free free list. [`Pool::get`] pops a
//! recycled buffer (or makes a fresh one) and wraps it in a [`Pooled`]
//! guard; dropping the guard resets the buffer and pushes it back. Drop
//! runs on every exit path, unwinding included, so a buffer can never leak
//! out of a request or be seen by two requests at once.
//!
//! Line buffers and escape buffers are different types, so handing one to
//! the other's pool does not compile.

use std::ops::{Deref, DerefMut};

use crossbeam_queue::SegQueue;

/// Initial capacity of a line buffer. Large enough for a line with every
/// escaped field at its cap.
pub(crate) const LINE_CAPACITY: usize = 0x400;

/// Line buffers that grew past this are dropped instead of recycled.
const LINE_RETAIN_LIMIT: usize = 0x1000;

/// Capacity of an escape buffer, and so the maximum length of any escaped
/// field value.
pub(crate) const ESCAPE_CAPACITY: usize = 0x80;

/// Something a [`Pool`] can hand out.
pub(crate) trait Recycle: Sized {
    fn fresh() -> Self;

    /// Resets the value for its next user. Returns `false` to have it
    /// dropped instead of returned to the pool.
    fn recycle(&mut self) -> bool;
}

pub(crate) struct Pool<T> {
    free: SegQueue<T>,
}

impl<T: Recycle> Pool<T> {
    pub(crate) fn new() -> Self {
        Self { free: SegQueue::new() }
    }

    pub(crate) fn get(&self) -> Pooled<'_, T> {
        let item = self.free.pop().unwrap_or_else(T::fresh);
        Pooled { pool: self, item: Some(item) }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Exclusive loan of one pooled value.
pub(crate) struct Pooled<'p, T: Recycle> {
    pool: &'p Pool<T>,
    // `None` only while dropping.
    item: Option<T>,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled value used after release"),
        }
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled value used after release"),
        }
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(mut item) = self.item.take() {
            if item.recycle() {
                self.pool.free.push(item);
            }
        }
    }
}

// ── Buffer types ──────────────────────────────────────────────────────────────

/// Assembles one complete log line.
pub(crate) struct LineBuf(pub(crate) Vec<u8>);

impl Recycle for LineBuf {
    fn fresh() -> Self {
        Self(Vec::with_capacity(LINE_CAPACITY))
    }

    fn recycle(&mut self) -> bool {
        self.0.clear();
        self.0.capacity() <= LINE_RETAIN_LIMIT
    }
}

/// Scratch space for sanitizing one field value.
///
/// Only the prefix written by the current user is ever read, so stale bytes
/// from an earlier user need no clearing.
pub(crate) struct EscapeBuf(pub(crate) Box<[u8; ESCAPE_CAPACITY]>);

impl Recycle for EscapeBuf {
    fn fresh() -> Self {
        Self(Box::new([0; ESCAPE_CAPACITY]))
    }

    fn recycle(&mut self) -> bool {
        true
    }
}
