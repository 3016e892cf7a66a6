//! Observability utilities.

mod subscriber;

pub use subscriber::{init_test_tracing, init_tracing, LogFormat};
