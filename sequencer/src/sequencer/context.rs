//! Per-run identity and event plumbing.

use crate::config::SequencerConfig;
use crate::events::{EventSink, FOREACH_ITEM};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Identity and event sink for a single execution run.
pub(crate) struct RunContext {
    run_id: Uuid,
    config: SequencerConfig,
    sink: Arc<dyn EventSink>,
}

impl RunContext {
    pub(crate) fn new(config: SequencerConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
            sink,
        }
    }

    pub(crate) const fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub(crate) fn name(&self) -> &str {
        &self.config.name
    }

    /// Merges the run identity into `fields`.
    fn payload(&self, fields: Value) -> Value {
        let mut payload = Map::new();
        payload.insert("sequence".to_string(), Value::String(self.config.name.clone()));
        payload.insert("run_id".to_string(), Value::String(self.run_id.to_string()));
        payload.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
        if let Value::Object(extra) = fields {
            payload.extend(extra);
        }
        Value::Object(payload)
    }

    /// Emits a run-level event.
    pub(crate) async fn emit(&self, event_type: &str, fields: Value) {
        self.sink.emit(event_type, Some(self.payload(fields))).await;
    }

    /// Emits a step-level event if step events are enabled.
    pub(crate) async fn emit_step(&self, event_type: &str, fields: Value) {
        if self.config.step_events {
            self.emit(event_type, fields).await;
        }
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Handed to every chained task so composite steps can report progress.
#[derive(Debug, Clone)]
pub(crate) struct StepScope {
    ctx: Arc<RunContext>,
    index: usize,
}

impl StepScope {
    pub(crate) const fn new(ctx: Arc<RunContext>, index: usize) -> Self {
        Self { ctx, index }
    }

    /// A scope bound to a throwaway run with no event sink.
    #[cfg(test)]
    pub(crate) fn detached(index: usize) -> Self {
        let ctx = RunContext::new(SequencerConfig::default(), Arc::new(crate::events::NoOpEventSink));
        Self::new(Arc::new(ctx), index)
    }

    pub(crate) async fn item_finished(&self, item: usize, items: usize, ok: bool) {
        debug!(step = self.index, item, items, ok, "Foreach item finished");
        if self.ctx.config.item_events {
            self.ctx
                .emit(
                    FOREACH_ITEM,
                    serde_json::json!({
                        "index": self.index,
                        "item": item,
                        "items": items,
                        "ok": ok,
                    }),
                )
                .await;
        }
    }
}
