//! Lifecycle events emitted while a sequence runs.
//!
//! Every payload is a JSON object carrying `sequence`, `run_id` and
//! `timestamp`, plus the fields listed next to each event type.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A run began. Fields: `steps`.
pub const SEQUENCE_STARTED: &str = "sequence.started";
/// A top-level step began. Fields: `index`, `kind`.
pub const STEP_STARTED: &str = "step.started";
/// A top-level step produced a value. Fields: `index`, `kind`, `duration_ms`.
pub const STEP_COMPLETED: &str = "step.completed";
/// A top-level step failed. Fields: `index`, `kind`, `duration_ms`, `recovered`.
pub const STEP_FAILED: &str = "step.failed";
/// A foreach item finished. Fields: `index`, `item`, `items`, `ok`.
pub const FOREACH_ITEM: &str = "foreach.item";
/// Aggregation ran over a complete history. Fields: `steps`, `ok`.
pub const SEQUENCE_COMPLETED: &str = "sequence.completed";
/// Aggregation ran over a recovered value. Fields: `failed_step`, `ok`.
pub const SEQUENCE_RECOVERED: &str = "sequence.recovered";
/// A step failed with no handler. Fields: `failed_step`.
pub const SEQUENCE_FAILED: &str = "sequence.failed";
