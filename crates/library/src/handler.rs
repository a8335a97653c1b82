//! Error handling collaborators.
//!
//! A sync run never aborts because of a single series; instead each failed
//! entry's error is handed to an [`ErrorHandler`]. That is the only channel
//! through which partial failure is visible to the caller.

use crate::error::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives one error per failed entry. Must not panic.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, err: Error);
}

impl<F> ErrorHandler for F
where
    F: Fn(Error) + Send + Sync,
{
    fn handle(&self, err: Error) {
        self(err)
    }
}

/// Discards every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorHandler;
impl ErrorHandler for NoopErrorHandler {
    fn handle(&self, _: Error) {}
}

/// Keeps every error it receives, in order.
#[derive(Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<Error>>,
}
impl ErrorCollector {
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the errors collected so far.
    pub fn take(&self) -> Vec<Error> {
        std::mem::take(&mut *self.lock())
    }

    // A panic while holding the lock can't leave a Vec half-pushed.
    fn lock(&self) -> MutexGuard<'_, Vec<Error>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
impl ErrorHandler for ErrorCollector {
    fn handle(&self, err: Error) {
        self.lock().push(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_collector_keeps_order() {
        let collector = ErrorCollector::default();
        collector.handle(exn::Exn::from(ErrorKind::NotFound("One".to_string())));
        collector.handle(exn::Exn::from(ErrorKind::NotFound("Two".to_string())));
        assert_eq!(collector.len(), 2);

        let errors = collector.take();
        assert!(matches!(&*errors[0], ErrorKind::NotFound(q) if q == "One"));
        assert!(matches!(&*errors[1], ErrorKind::NotFound(q) if q == "Two"));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_closure_handler() {
        let count = AtomicUsize::new(0);
        let handler = |_: Error| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        handler.handle(exn::Exn::from(ErrorKind::Registration("nope".to_string())));
        NoopErrorHandler.handle(exn::Exn::from(ErrorKind::Registration("ignored".to_string())));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
