//! Logging collaborator injected into analysis runs and renderers.
//!
//! The engine never touches global logging state. Whoever drives it passes a
//! [`Logger`], which can forward to any logging backend, record messages for
//! inspection, or discard them.

use std::{cell::RefCell, fmt};

/// Sink for progress and diagnostic messages.
///
/// Messages are passed as [`fmt::Arguments`] so that a discarding logger never
/// pays for formatting.
///
/// ```
/// use coefscope_engine::{Logger, RecordingLogger};
///
/// let logger = RecordingLogger::default();
/// logger.info(format_args!("running {} iterations", 100));
/// assert_eq!(logger.messages(), vec!["INFO running 100 iterations".to_owned()]);
/// ```
pub trait Logger {
    fn info(&self, msg: fmt::Arguments<'_>);
    fn debug(&self, msg: fmt::Arguments<'_>);
}

impl<L> Logger for &L
where
    L: Logger + ?Sized,
{
    fn info(&self, msg: fmt::Arguments<'_>) {
        (**self).info(msg);
    }

    fn debug(&self, msg: fmt::Arguments<'_>) {
        (**self).debug(msg);
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _msg: fmt::Arguments<'_>) {}
    fn debug(&self, _msg: fmt::Arguments<'_>) {}
}

/// Keeps every message in memory, prefixed with its level.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: RefCell<Vec<String>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Returns `true` if any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: fmt::Arguments<'_>) {
        self.messages.borrow_mut().push(format!("INFO {msg}"));
    }

    fn debug(&self, msg: fmt::Arguments<'_>) {
        self.messages.borrow_mut().push(format!("DEBUG {msg}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarding_through_reference() {
        let logger = RecordingLogger::default();
        let dyn_logger: &dyn Logger = &logger;
        (&dyn_logger).debug(format_args!("x = {}", 1.5));
        assert_eq!(logger.messages(), vec!["DEBUG x = 1.5".to_owned()]);
        assert!(logger.contains("x = 1.5"));
    }
}
