//! Timed observation scopes
//!
//! - `{name}_BEGIN` on creation (INFO)
//! - `{name}_COMPLETE` with `elapsed_ms` on `complete` (INFO)
//! - `{name}_FAILED` with `elapsed_ms` and `reason` on `fail` (ERROR) or
//!   `fail_fatal` (FATAL)
//! - `{name}_INCOMPLETE` if dropped without either (WARN)

use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that logs its own begin, outcome, and duration
///
/// ```ignore
/// let scope = ObservationScope::with_fields("DELETED_DOCS_READ", &[("path", &path)]);
/// // ... do work ...
/// scope.complete_with_fields(&[("count", "3")]);
/// ```
pub struct ObservationScope {
    name: &'static str,
    fields: Vec<(&'static str, String)>,
    timer: Timer,
    finished: bool,
}

impl ObservationScope {
    pub fn new(name: &'static str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a scope whose fields are repeated on every event it logs
    pub fn with_fields(name: &'static str, fields: &[(&'static str, &str)]) -> Self {
        let scope = Self {
            name,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
            finished: false,
        };
        scope.emit(Severity::Info, "BEGIN", &[]);
        scope
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        let mut fields = extra.to_vec();
        fields.push(("elapsed_ms", elapsed.as_str()));
        self.emit(Severity::Info, "COMPLETE", &fields);
    }

    pub fn fail(self, reason: &str) {
        self.finish_failed(Severity::Error, reason);
    }

    pub fn fail_fatal(self, reason: &str) {
        self.finish_failed(Severity::Fatal, reason);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish_failed(mut self, severity: Severity, reason: &str) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        self.emit(
            severity,
            "FAILED",
            &[("reason", reason), ("elapsed_ms", elapsed.as_str())],
        );
    }

    fn emit(&self, severity: Severity, suffix: &str, extra: &[(&str, &str)]) {
        let event = format!("{}_{}", self.name, suffix);
        let mut fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        fields.extend_from_slice(extra);
        Logger::log(severity, &event, &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            self.emit(
                Severity::Warn,
                "INCOMPLETE",
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// Wall-clock timer for elapsed-time fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_finished());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields("TEST", &[("path", "seg_1.del")]);
        scope.complete_with_fields(&[("count", "3")]);
    }

    #[test]
    fn test_scope_fail_variants() {
        ObservationScope::new("TEST").fail("checksum mismatch");
        ObservationScope::new("TEST").fail_fatal("write failed");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
