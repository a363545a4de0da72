//! # Diagnostics
//!
//! Human-readable progress and failure messages for hosts.
//!
//! Every message goes to the `log` facade. When a `MessageSink` is attached it
//! also receives the text, which is how a browser front end or a terminal
//! prints "compiling code..." and halt reasons.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receiver for diagnostic messages.
///
/// Implemented for every `FnMut(&str)`, so a closure can be used directly.
pub trait MessageSink {
    /// Handles one message.
    fn message(&mut self, text: &str);
}

impl<F: FnMut(&str)> MessageSink for F {
    fn message(&mut self, text: &str) {
        self(text)
    }
}

/// Severity of a diagnostic, used to pick the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress and success messages.
    Info,
    /// Assembly failures and halt reasons.
    Warn,
}

/// Fan-out of diagnostic messages to `log` and an optional sink.
#[derive(Default)]
pub struct Diagnostics {
    sink: Option<Box<dyn MessageSink>>,
}

impl Diagnostics {
    /// Creates diagnostics that only log.
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Creates diagnostics that also forward to `sink`.
    pub fn with_sink<S: MessageSink + 'static>(sink: S) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    /// Replaces the sink. `None` detaches it.
    pub fn set_sink(&mut self, sink: Option<Box<dyn MessageSink>>) {
        self.sink = sink;
    }

    /// Returns true if a sink is attached.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Emits a message at `level`.
    pub fn emit(&mut self, level: Level, text: &str) {
        match level {
            Level::Info => log::info!("{}", text),
            Level::Warn => log::warn!("{}", text),
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.message(text);
        }
    }

    /// Emits a progress message.
    pub fn info(&mut self, text: &str) {
        self.emit(Level::Info, text);
    }

    /// Emits a failure message.
    pub fn warn(&mut self, text: &str) {
        self.emit(Level::Warn, text);
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Shared, clonable sink that records every message.
///
/// # Examples
///
/// ```
/// use sim6502::{Diagnostics, MessageLog};
///
/// let log = MessageLog::new();
/// let mut diagnostics = Diagnostics::with_sink(log.clone());
/// diagnostics.info("indexing labels...");
/// assert_eq!(log.messages(), vec!["indexing labels...".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Rc<RefCell<Vec<String>>>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every message received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Returns true if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }

    /// Most recent message.
    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    /// Forgets all messages.
    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl MessageSink for MessageLog {
    fn message(&mut self, text: &str) {
        self.messages.borrow_mut().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_receives_messages() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::clone(&seen);
        let mut diagnostics = Diagnostics::with_sink(move |text: &str| out.borrow_mut().push(text.to_string()));

        diagnostics.info("compiling code...");
        diagnostics.warn("no code to run");

        assert_eq!(*seen.borrow(), vec!["compiling code...", "no code to run"]);
    }

    #[test]
    fn test_without_sink_is_silent() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_sink());
        diagnostics.info("nobody listening");
    }

    #[test]
    fn test_message_log_shared_between_clones() {
        let log = MessageLog::new();
        let mut diagnostics = Diagnostics::with_sink(log.clone());
        diagnostics.info("found 2 labels");
        assert!(log.contains("2 labels"));
        assert_eq!(log.last().as_deref(), Some("found 2 labels"));
        log.clear();
        assert!(log.messages().is_empty());
    }
}
