//! # Request Sequencer
//!
//! A fluent builder for running asynchronous steps strictly one after
//! another.
//!
//! - **Result threading**: each step receives the previous step's result
//! - **Per-step recovery**: `catch` attaches a handler to the last step
//! - **Foreach expansion**: map a task over a list, one item at a time
//! - **Two-phase completion**: `end` settles the run, `guarantee` always
//!   produces a value
//!
//! ## Quick Start
//!
//! ```rust
//! use request_sequencer::prelude::*;
//! use serde_json::{json, Value};
//!
//! # tokio_test::block_on(async {
//! let value = Sequencer::<Value, Value>::new()
//!     .next(|_| async { Ok(json!(["a", "b"])) })
//!     .foreach(
//!         Items::from_fn(|prev: Option<&Value>| {
//!             prev.and_then(Value::as_array).cloned().unwrap_or_default()
//!         }),
//!         |item: Value, _| async move { Ok(json!(format!("{}!", item.as_str().unwrap_or("")))) },
//!     )
//!     .end(|settled| Ok(settled.into_value()))
//!     .guarantee(Fallback::with(|failure| failure))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(value, json!([["a", "b"], ["a!", "b!"]]));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod events;
pub mod finalized;
pub mod observability;
pub mod sequencer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SequencerConfig;
    pub use crate::errors::{ErrorInfo, SequencerError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::finalized::{DefaultRecovery, Fallback, Finalized};
    pub use crate::sequencer::{History, Items, Sequencer, Settled, StepKind};
}
