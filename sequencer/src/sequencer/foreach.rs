//! Foreach expansion: one composite step mapping a task over a list.

use super::context::StepScope;
use super::step::Task;
use futures::FutureExt;
use std::fmt;
use std::future::Future;

/// The item list of a foreach step.
pub enum Items<I, T> {
    /// A list known when the chain is built.
    Fixed(Vec<I>),
    /// A list computed from the previous step's result when the step runs.
    Resolve(Box<dyn FnOnce(Option<&T>) -> Vec<I> + Send>),
}

impl<I, T> Items<I, T> {
    /// Creates a list resolved at execution time from the previous result.
    pub fn from_fn<F>(resolve: F) -> Self
    where
        F: FnOnce(Option<&T>) -> Vec<I> + Send + 'static,
    {
        Self::Resolve(Box::new(resolve))
    }

    /// Produces the concrete list for this run.
    pub fn resolve(self, previous: Option<&T>) -> Vec<I> {
        match self {
            Self::Fixed(items) => items,
            Self::Resolve(resolve) => resolve(previous),
        }
    }
}

impl<I, T> From<Vec<I>> for Items<I, T> {
    fn from(items: Vec<I>) -> Self {
        Self::Fixed(items)
    }
}

impl<I: fmt::Debug, T> fmt::Debug for Items<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(items) => f.debug_tuple("Fixed").field(items).finish(),
            Self::Resolve(_) => f.write_str("Resolve(..)"),
        }
    }
}

/// Builds the composite task. Items run one at a time in list order; the
/// first failing item fails the whole step.
pub(crate) fn foreach_task<I, T, E, F, Fut>(items: Items<I, T>, mut per_item: F) -> Task<T, E>
where
    I: Send + 'static,
    T: From<Vec<T>> + Clone + Send + 'static,
    E: Send + 'static,
    F: FnMut(I, Option<T>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    Task::Chained(Box::new(move |previous: Option<T>, scope: StepScope| {
        async move {
            let resolved = items.resolve(previous.as_ref());
            let total = resolved.len();
            let mut results = Vec::with_capacity(total);

            for (position, item) in resolved.into_iter().enumerate() {
                let outcome = per_item(item, previous.clone()).await;
                scope.item_finished(position, total, outcome.is_ok()).await;
                results.push(outcome?);
            }

            Ok(T::from(results))
        }
        .boxed()
    }))
}
