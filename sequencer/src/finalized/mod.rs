//! Finalized results and last-resort recovery.
//!
//! This module provides:
//! - `Finalized`, the already-running outcome returned by `Sequencer::end`
//! - `Fallback`, the argument of `Finalized::guarantee`
//! - `DefaultRecovery`, the construction-time default handler

mod recovery;
mod result;

pub use recovery::DefaultRecovery;
pub use result::{Fallback, Finalized};
