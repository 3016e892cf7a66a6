//! Sequencer configuration.

use crate::errors::SequencerError;
use serde::{Deserialize, Serialize};

/// Default sequence name used in logs and events.
pub const DEFAULT_SEQUENCE_NAME: &str = "sequence";

/// Configuration for a sequencer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Name reported in tracing spans and event payloads.
    pub name: String,
    /// Emit `step.*` events for every top-level step.
    pub step_events: bool,
    /// Emit a `foreach.item` event for every item of a foreach step.
    pub item_events: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SEQUENCE_NAME.to_string(),
            step_events: true,
            item_events: false,
        }
    }
}

impl SequencerConfig {
    /// Creates a new config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sequence name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables per-step events.
    #[must_use]
    pub const fn with_step_events(mut self, enabled: bool) -> Self {
        self.step_events = enabled;
        self
    }

    /// Enables or disables per-item foreach events.
    #[must_use]
    pub const fn with_item_events(mut self, enabled: bool) -> Self {
        self.item_events = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SequencerError::InvalidConfig` if the name is blank.
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.name.trim().is_empty() {
            return Err(SequencerError::InvalidConfig(
                "sequence name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SequencerConfig::default();
        assert_eq!(config.name, "sequence");
        assert!(config.step_events);
        assert!(!config.item_events);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = SequencerConfig::new()
            .with_name("checkout")
            .with_step_events(false)
            .with_item_events(true);

        assert_eq!(config.name, "checkout");
        assert!(!config.step_events);
        assert!(config.item_events);
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let err = SequencerConfig::new().with_name("  ").validate().unwrap_err();
        assert_eq!(err.code(), "SEQ-003-INVALID_CONFIG");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SequencerConfig =
            serde_json::from_str(r#"{"name": "import", "item_events": true}"#).unwrap();
        assert_eq!(config.name, "import");
        assert!(config.step_events);
        assert!(config.item_events);
    }
}
