//! Diagnostic trace sink threaded through every builder call.
//!
//! The sink is opaque to the builder framework: it accepts diagnostic lines
//! and nothing here interprets them. Operations emit one line per runtime
//! decision so an engine operator can follow a document through a pipeline.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Cheaply cloneable handle to a diagnostic callback.
#[derive(Clone)]
pub struct TraceSink {
    inner: Arc<dyn Fn(&str) + Send + Sync>,
}

impl TraceSink {
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// A sink that discards everything.
    pub fn null() -> Self {
        Self::new(|_| {})
    }

    /// A sink that appends every line to a shared buffer. Test tooling.
    pub fn collector() -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&buffer);
        let sink = Self::new(move |line| {
            writer.lock().expect("trace buffer poisoned").push(line.to_string());
        });
        (sink, buffer)
    }

    pub fn emit(&self, line: &str) {
        (self.inner)(line);
    }
}

impl fmt::Debug for TraceSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_records_lines() {
        let (sink, buffer) = TraceSink::collector();
        sink.emit("first");
        sink.clone().emit("second");

        let lines = buffer.lock().unwrap();
        assert_eq!(*lines, vec!["first", "second"]);
    }

    #[test]
    fn test_null_sink_accepts_lines() {
        TraceSink::null().emit("goes nowhere");
    }
}
