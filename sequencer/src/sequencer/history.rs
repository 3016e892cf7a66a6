//! Step results handed to the aggregation callback.

use std::ops::Index;

/// Ordered results of every executed step, one entry per top-level step.
///
/// A foreach step contributes a single entry holding its list of per-item
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History<T> {
    results: Vec<T>,
}

impl<T> History<T> {
    /// Returns the number of recorded results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no step ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the result of the step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.results.get(index)
    }

    /// Returns the result of the final step.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.results.last()
    }

    /// Iterates over results in step order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }

    /// Returns the results as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.results
    }

    /// Consumes the history, returning the raw results.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.results
    }
}

impl<T> From<Vec<T>> for History<T> {
    fn from(results: Vec<T>) -> Self {
        Self { results }
    }
}

impl<T> Index<usize> for History<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.results[index]
    }
}

impl<T> IntoIterator for History<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a History<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// What the aggregation callback receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    /// Every step succeeded.
    Completed(History<T>),
    /// A step failed and its handler produced this value. The partial
    /// history is discarded.
    Recovered(T),
}

impl<T> Settled<T> {
    /// Returns true if a handler recovered a failure.
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }

    /// Returns the history of a completed run.
    #[must_use]
    pub const fn history(&self) -> Option<&History<T>> {
        match self {
            Self::Completed(history) => Some(history),
            Self::Recovered(_) => None,
        }
    }

    /// Consumes self, returning the history of a completed run.
    #[must_use]
    pub fn into_history(self) -> Option<History<T>> {
        match self {
            Self::Completed(history) => Some(history),
            Self::Recovered(_) => None,
        }
    }

    /// Consumes self, returning the recovered value.
    #[must_use]
    pub fn into_recovered(self) -> Option<T> {
        match self {
            Self::Completed(_) => None,
            Self::Recovered(value) => Some(value),
        }
    }
}

impl<T: From<Vec<T>>> Settled<T> {
    /// Flattens to a single value: a completed history becomes a list
    /// value, a recovered value is returned as is.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Completed(history) => T::from(history.into_vec()),
            Self::Recovered(value) => value,
        }
    }
}
