//! Observability for deldocs
//!
//! - Structured logging (JSON, one line per event)
//! - Timed begin/complete scopes around codec operations
//!
//! Observability is read-only: a failed log write never fails the operation
//! being logged.
//!
//! ```ignore
//! use deldocs::observability::{Logger, ObservationScope};
//!
//! Logger::info("SEGMENT_LOADED", &[("segment", "seg_7")]);
//!
//! let scope = ObservationScope::new("DELETED_DOCS_WRITE");
//! // ... do work ...
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{render, Logger, Severity};
pub use scope::{ObservationScope, Timer};
