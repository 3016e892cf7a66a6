//! Sequencer building and execution.
//!
//! This module provides:
//! - The fluent `Sequencer` builder
//! - Foreach expansion over fixed or computed item lists
//! - The sequential execution loop
//! - `History` and `Settled`, the aggregation input

mod builder;
mod context;
mod foreach;
mod history;
mod runner;
mod step;


pub use builder::Sequencer;
pub use foreach::Items;
pub use history::{History, Settled};
pub use step::StepKind;
