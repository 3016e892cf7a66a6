//! Error types for the request sequencer.
//!
//! Failures produced by user tasks travel through the sequencer as the
//! caller's own error type `E`. The types here cover misuse of the builder
//! and finalizer surface only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the sequencer itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// `catch` was called before any step was appended.
    #[error("Cannot attach an error handler: index out of range, the sequence has no steps")]
    EmptyQueue,

    /// `guarantee` asked for the default recovery but none was bound.
    #[error(
        "You seem to want to use the default recovery handler, but you haven't set one. \
         A default recovery handler must be set when the sequencer is constructed."
    )]
    MissingDefaultRecovery,

    /// The sequencer configuration is invalid.
    #[error("Invalid sequencer configuration: {0}")]
    InvalidConfig(String),
}

impl SequencerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyQueue => "SEQ-001-EMPTY_QUEUE",
            Self::MissingDefaultRecovery => "SEQ-002-NO_DEFAULT_RECOVERY",
            Self::InvalidConfig(_) => "SEQ-003-INVALID_CONFIG",
        }
    }

    /// Returns diagnostic information for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.code(), self.to_string());
        match self {
            Self::EmptyQueue => info.with_fix_hint(
                "Call `next`, `next_value` or `foreach` before attaching a handler with `catch`.",
            ),
            Self::MissingDefaultRecovery => info.with_fix_hint(
                "Construct the sequencer with `with_default_recovery`, or pass an explicit \
                 handler to `guarantee`.",
            ),
            Self::InvalidConfig(_) => info,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = self.error_info().to_dict();
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Metadata about an error for better diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "SEQ-001-EMPTY_QUEUE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SequencerError::EmptyQueue.code(), "SEQ-001-EMPTY_QUEUE");
        assert_eq!(
            SequencerError::MissingDefaultRecovery.code(),
            "SEQ-002-NO_DEFAULT_RECOVERY"
        );
        assert_eq!(
            SequencerError::InvalidConfig("x".into()).code(),
            "SEQ-003-INVALID_CONFIG"
        );
    }

    #[test]
    fn test_missing_default_message_mentions_construction() {
        let err = SequencerError::MissingDefaultRecovery;
        assert!(err.to_string().contains("constructed"));
    }

    #[test]
    fn test_error_info_has_fix_hint() {
        let info = SequencerError::EmptyQueue.error_info();
        assert_eq!(info.code, "SEQ-001-EMPTY_QUEUE");
        assert!(info.fix_hint.unwrap().contains("catch"));

        let info = SequencerError::InvalidConfig("empty name".into()).error_info();
        assert!(info.fix_hint.is_none());
        assert!(info.summary.contains("empty name"));
    }

    #[test]
    fn test_to_dict() {
        let dict = SequencerError::MissingDefaultRecovery.to_dict();
        assert_eq!(dict.get("code").unwrap(), "SEQ-002-NO_DEFAULT_RECOVERY");
        assert!(dict.contains_key("fix_hint"));
        assert!(dict.contains_key("message"));
    }
}
