#![forbid(unsafe_code)]

//! Listener bookkeeping for teardown.
//!
//! Every listener a host registers is represented by a handle whose
//! [`Unsubscribe::unsubscribe`] undoes the registration. [`Subscriptions`]
//! collects them so a single teardown removes everything, newest first.

/// A registration that can be undone exactly once.
pub trait Unsubscribe {
    fn unsubscribe(self);
}

#[derive(Debug)]
pub struct Subscriptions<H: Unsubscribe> {
    handles: Vec<H>,
}

impl<H: Unsubscribe> Default for Subscriptions<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H: Unsubscribe> Subscriptions<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: H) {
        self.handles.push(handle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Unsubscribe every handle in reverse registration order.
    ///
    /// Returns how many handles were removed. Calling it again is a no-op.
    pub fn teardown(&mut self) -> usize {
        let count = self.handles.len();
        while let Some(handle) = self.handles.pop() {
            handle.unsubscribe();
        }
        if count > 0 {
            tracing::debug!(count, "listeners removed");
        }
        count
    }
}

impl<H: Unsubscribe> Drop for Subscriptions<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
