//! The fluent sequencer builder.

use super::context::RunContext;
use super::foreach::{foreach_task, Items};
use super::history::Settled;
use super::runner;
use super::step::{Step, StepKind, Task};
use crate::config::SequencerConfig;
use crate::errors::SequencerError;
use crate::events::{EventSink, NoOpEventSink};
use crate::finalized::{DefaultRecovery, Finalized};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// An ordered plan of asynchronous steps.
///
/// Steps run strictly one after another in insertion order. Each function
/// step receives the previous step's result (`None` for the first step).
/// Nothing runs until [`Sequencer::end`] is called.
///
/// # Example
///
/// ```
/// use request_sequencer::prelude::*;
///
/// # tokio_test::block_on(async {
/// let finalized = Sequencer::<i64, String>::new()
///     .next(|_| async { Ok(1) })
///     .next(|prev| async move { Ok(prev.unwrap_or_default() + 1) })
///     .end(|settled| match settled {
///         Settled::Completed(history) => Ok(history[1]),
///         Settled::Recovered(value) => Ok(value),
///     });
///
/// assert_eq!(finalized.await, Ok(2));
/// # });
/// ```
pub struct Sequencer<T, E> {
    steps: Vec<Step<T, E>>,
    default_recovery: DefaultRecovery<T, E>,
    config: SequencerConfig,
    sink: Arc<dyn EventSink>,
}

impl<T, E> Sequencer<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Creates an empty sequencer with no default recovery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            default_recovery: DefaultRecovery::None,
            config: SequencerConfig::default(),
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Binds the default recovery used by `guarantee(Fallback::Default)`.
    #[must_use]
    pub fn with_default_recovery(mut self, recovery: DefaultRecovery<T, E>) -> Self {
        self.default_recovery = recovery;
        self
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SequencerError::InvalidConfig` if the config does not validate.
    pub fn with_config(mut self, config: SequencerConfig) -> Result<Self, SequencerError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Sets the sink that receives lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Appends a step that receives the previous step's result.
    ///
    /// Extra inputs are captured by the closure.
    #[must_use]
    pub fn next<F, Fut>(mut self, task: F) -> Self
    where
        F: FnOnce(Option<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.steps.push(Step::new(StepKind::Task, Task::from_fn(task)));
        self
    }

    /// Appends a step that awaits `future` without looking at the previous
    /// result.
    ///
    /// The future is not polled until its turn in the sequence.
    #[must_use]
    pub fn next_value<Fut>(mut self, future: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.steps.push(Step::new(StepKind::Value, Task::from_future(future)));
        self
    }

    /// Attaches a recovery handler to the most recently appended step,
    /// replacing any handler it already had.
    ///
    /// If that step fails, the handler's value is passed to the aggregation
    /// callback as [`Settled::Recovered`] and no later step runs. The handler
    /// covers only its own step.
    ///
    /// # Errors
    ///
    /// Returns `SequencerError::EmptyQueue` if no step has been appended.
    pub fn catch<H>(mut self, handler: H) -> Result<Self, SequencerError>
    where
        H: FnOnce(E) -> T + Send + 'static,
    {
        let step = self.steps.last_mut().ok_or(SequencerError::EmptyQueue)?;
        step.handler = Some(Box::new(handler));
        Ok(self)
    }

    /// Appends one step that runs `task` for every item, one at a time, in
    /// list order.
    ///
    /// `items` is either a fixed list or [`Items::from_fn`], which computes
    /// the list from the previous result when the step runs. Each call gets
    /// the item and a copy of the previous result. The per-item results are
    /// collected into a list value; an empty list yields an empty list value.
    /// The first failing item fails the whole step.
    #[must_use]
    pub fn foreach<I, F, Fut>(mut self, items: impl Into<Items<I, T>>, task: F) -> Self
    where
        T: From<Vec<T>>,
        I: Send + 'static,
        F: FnMut(I, Option<T>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.steps
            .push(Step::new(StepKind::Foreach, foreach_task(items.into(), task)));
        self
    }

    /// Freezes the plan and starts running it on the current tokio runtime.
    ///
    /// `aggregate` receives [`Settled::Completed`] with every step's result,
    /// or [`Settled::Recovered`] with a handler's value after a failure. A
    /// failure with no handler, or an error returned by `aggregate`, becomes
    /// the rejection of the returned [`Finalized`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn end<A>(self, aggregate: A) -> Finalized<T, E>
    where
        A: FnOnce(Settled<T>) -> Result<T, E> + Send + 'static,
    {
        let Self {
            steps,
            default_recovery,
            config,
            sink,
        } = self;

        let ctx = Arc::new(RunContext::new(config, sink));
        let run_id = ctx.run_id();
        let span = info_span!("sequence", sequence = %ctx.name(), %run_id, steps = steps.len());

        let handle = tokio::spawn(runner::execute(steps, aggregate, ctx).instrument(span));
        Finalized::new(handle, default_recovery, run_id)
    }

    /// Returns the number of queued steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no step has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the kinds of the queued steps, in order.
    #[must_use]
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|step| step.kind).collect()
    }

    /// Returns the sequence name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Returns the bound default recovery.
    #[must_use]
    pub const fn default_recovery(&self) -> &DefaultRecovery<T, E> {
        &self.default_recovery
    }
}

impl<T, E> Default for Sequencer<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Sequencer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("name", &self.config.name)
            .field("steps", &self.steps)
            .field("default_recovery", &self.default_recovery)
            .finish_non_exhaustive()
    }
}
