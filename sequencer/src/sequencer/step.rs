//! Steps: the unit of work stored in a sequencer queue.

use super::context::StepScope;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The boxed future every step resolves through.
pub(crate) type StepFuture<T, E> = BoxFuture<'static, Result<T, E>>;

/// A task that receives the previous step's result.
pub(crate) type ChainedTask<T, E> = Box<dyn FnOnce(Option<T>, StepScope) -> StepFuture<T, E> + Send>;

/// A recovery handler attached to a single step.
pub(crate) type ErrorHandler<T, E> = Box<dyn FnOnce(E) -> T + Send>;

/// What kind of task a step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// A function of the previous result.
    Task,
    /// A bare future that ignores the previous result.
    Value,
    /// A foreach expansion over a list of items.
    Foreach,
}

impl StepKind {
    /// Returns the kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Value => "value",
            Self::Foreach => "foreach",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) enum Task<T, E> {
    Chained(ChainedTask<T, E>),
    Ready(StepFuture<T, E>),
}

impl<T, E> Task<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn from_fn<F, Fut>(task: F) -> Self
    where
        F: FnOnce(Option<T>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::Chained(Box::new(move |previous: Option<T>, _scope: StepScope| {
            task(previous).boxed()
        }))
    }

    pub(crate) fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::Ready(future.boxed())
    }

    /// Starts the task. The previous result is cloned only for chained tasks.
    pub(crate) fn start(self, previous: Option<&T>, scope: StepScope) -> StepFuture<T, E> {
        match self {
            Self::Chained(task) => task(previous.cloned(), scope),
            Self::Ready(future) => future,
        }
    }
}

/// A queued step with its optional, step-local recovery handler.
pub(crate) struct Step<T, E> {
    pub(crate) kind: StepKind,
    pub(crate) task: Task<T, E>,
    pub(crate) handler: Option<ErrorHandler<T, E>>,
}

impl<T, E> Step<T, E> {
    pub(crate) fn new(kind: StepKind, task: Task<T, E>) -> Self {
        Self {
            kind,
            task,
            handler: None,
        }
    }

    pub(crate) const fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl<T, E> fmt::Debug for Step<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("kind", &self.kind)
            .field("has_handler", &self.has_handler())
            .finish_non_exhaustive()
    }
}
