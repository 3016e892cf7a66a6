//! The sequential execution loop.

use super::context::{RunContext, StepScope};
use super::history::{History, Settled};
use super::step::Step;
use crate::events::{
    SEQUENCE_COMPLETED, SEQUENCE_FAILED, SEQUENCE_RECOVERED, SEQUENCE_STARTED, STEP_COMPLETED,
    STEP_FAILED, STEP_STARTED,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs `steps` in order, threading each result into the next step, then
/// aggregates.
///
/// On the first failure the loop stops. The failing step's own handler, if
/// any, produces the value passed to `aggregate` as `Settled::Recovered`;
/// without a handler the failure is returned unchanged.
pub(crate) async fn execute<T, E, A>(
    steps: Vec<Step<T, E>>,
    aggregate: A,
    ctx: Arc<RunContext>,
) -> Result<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
    A: FnOnce(Settled<T>) -> Result<T, E>,
{
    let total = steps.len();
    debug!(steps = total, "Sequence started");
    ctx.emit(SEQUENCE_STARTED, json!({ "steps": total })).await;

    let mut history: Vec<T> = Vec::with_capacity(total);

    for (index, step) in steps.into_iter().enumerate() {
        let Step {
            kind,
            task,
            handler,
        } = step;

        ctx.emit_step(STEP_STARTED, json!({ "index": index, "kind": kind })).await;
        let started = Instant::now();

        let future = task.start(history.last(), StepScope::new(Arc::clone(&ctx), index));
        let outcome = future.await;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let failure = match outcome {
            Ok(value) => {
                debug!(step = index, %kind, duration_ms, "Step completed");
                ctx.emit_step(
                    STEP_COMPLETED,
                    json!({ "index": index, "kind": kind, "duration_ms": duration_ms }),
                )
                .await;
                history.push(value);
                continue;
            }
            Err(failure) => failure,
        };

        let recovered = handler.is_some();
        warn!(step = index, %kind, duration_ms, recovered, "Step failed");
        ctx.emit_step(
            STEP_FAILED,
            json!({
                "index": index,
                "kind": kind,
                "duration_ms": duration_ms,
                "recovered": recovered,
            }),
        )
        .await;

        let Some(handler) = handler else {
            ctx.emit(SEQUENCE_FAILED, json!({ "failed_step": index })).await;
            return Err(failure);
        };

        let result = aggregate(Settled::Recovered(handler(failure)));
        info!(step = index, ok = result.is_ok(), "Step failure recovered by its handler");
        ctx.emit(
            SEQUENCE_RECOVERED,
            json!({ "failed_step": index, "ok": result.is_ok() }),
        )
        .await;
        return result;
    }

    let result = aggregate(Settled::Completed(History::from(history)));
    debug!(steps = total, ok = result.is_ok(), "Sequence completed");
    ctx.emit(SEQUENCE_COMPLETED, json!({ "steps": total, "ok": result.is_ok() }))
        .await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequencerConfig;
    use crate::events::{CollectingEventSink, NoOpEventSink};
    use crate::sequencer::step::{StepKind, Task};

    fn ctx() -> Arc<RunContext> {
        Arc::new(RunContext::new(SequencerConfig::default(), Arc::new(NoOpEventSink)))
    }

    fn value_step(value: i64) -> Step<i64, String> {
        Step::new(StepKind::Value, Task::from_future(async move { Ok(value) }))
    }

    fn failing_step(message: &str) -> Step<i64, String> {
        let message = message.to_string();
        Step::new(StepKind::Value, Task::from_future(async move { Err(message) }))
    }

    fn sum(settled: Settled<i64>) -> Result<i64, String> {
        match settled {
            Settled::Completed(history) => Ok(history.iter().sum()),
            Settled::Recovered(value) => Ok(value),
        }
    }

    #[tokio::test]
    async fn test_empty_run_aggregates_empty_history() {
        let result = execute(Vec::<Step<i64, String>>::new(), |s| Ok(s.history().map_or(-1, |h| h.len() as i64)), ctx()).await;
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_threads_previous_result() {
        let steps = vec![
            value_step(10),
            Step::new(
                StepKind::Task,
                Task::from_fn(|prev: Option<i64>| async move { Ok(prev.unwrap_or_default() * 2) }),
            ),
        ];
        assert_eq!(execute(steps, sum, ctx()).await, Ok(30));
    }

    #[tokio::test]
    async fn test_failure_without_handler_is_raw() {
        let steps = vec![value_step(1), failing_step("boom"), value_step(3)];
        assert_eq!(execute(steps, sum, ctx()).await, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_failure_uses_failing_steps_handler() {
        let mut guarded = value_step(1);
        guarded.handler = Some(Box::new(|_: String| 100));
        let mut failing = failing_step("boom");
        failing.handler = Some(Box::new(|e: String| e.len() as i64));

        let steps = vec![guarded, failing];
        assert_eq!(execute(steps, sum, ctx()).await, Ok(4));
    }

    #[tokio::test]
    async fn test_earlier_handler_does_not_cover_later_step() {
        let mut guarded = value_step(1);
        guarded.handler = Some(Box::new(|_: String| 100));

        let steps = vec![guarded, failing_step("late")];
        assert_eq!(execute(steps, sum, ctx()).await, Err("late".to_string()));
    }

    #[tokio::test]
    async fn test_aggregation_failure_is_not_recovered() {
        let mut step = value_step(1);
        step.handler = Some(Box::new(|_: String| 100));
        let result = execute(vec![step], |_| Err("aggregate".to_string()), ctx()).await;
        assert_eq!(result, Err("aggregate".to_string()));
    }

    #[tokio::test]
    async fn test_event_sequence() {
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = Arc::new(RunContext::new(SequencerConfig::default(), sink.clone()));

        let _ = execute(vec![value_step(1), failing_step("x")], sum, ctx).await;

        assert_eq!(
            sink.event_types(),
            vec![
                "sequence.started",
                "step.started",
                "step.completed",
                "step.started",
                "step.failed",
                "sequence.failed",
            ]
        );
    }
}
