//! The construction-time default recovery handler.

use std::fmt;
use std::sync::Arc;

/// Default recovery bound to a sequencer when it is constructed and used by
/// `guarantee(Fallback::Default)`.
///
/// The three states are distinct: `None` makes a default-guarantee a
/// configuration error, it never falls back to identity.
pub enum DefaultRecovery<T, E> {
    /// No default recovery.
    None,
    /// Returns the failure itself, converted into a value.
    Identity(fn(E) -> T),
    /// A caller-supplied recovery function.
    Custom(Arc<dyn Fn(E) -> T + Send + Sync>),
}

impl<T, E> DefaultRecovery<T, E> {
    /// Wraps a custom recovery function.
    pub fn custom<F>(recover: F) -> Self
    where
        F: Fn(E) -> T + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(recover))
    }

    /// Returns true unless this is `None`.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the state name: `none`, `identity` or `custom`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Identity(_) => "identity",
            Self::Custom(_) => "custom",
        }
    }

    /// Applies the recovery, or returns `None` if nothing is bound.
    pub fn recover(&self, failure: E) -> Option<T> {
        match self {
            Self::None => None,
            Self::Identity(convert) => Some(convert(failure)),
            Self::Custom(recover) => Some(recover(failure)),
        }
    }
}

impl<T: From<E>, E> DefaultRecovery<T, E> {
    /// Recovery that turns the failure into the value.
    #[must_use]
    pub fn identity() -> Self {
        Self::Identity(<T as From<E>>::from)
    }
}

impl<T, E> Default for DefaultRecovery<T, E> {
    fn default() -> Self {
        Self::None
    }
}

impl<T, E> Clone for DefaultRecovery<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Identity(convert) => Self::Identity(*convert),
            Self::Custom(recover) => Self::Custom(Arc::clone(recover)),
        }
    }
}

impl<T, E> fmt::Debug for DefaultRecovery<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefaultRecovery::{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_unbound() {
        let recovery: DefaultRecovery<String, String> = DefaultRecovery::default();
        assert!(!recovery.is_bound());
        assert_eq!(recovery.kind(), "none");
        assert_eq!(recovery.recover("boom".to_string()), None);
    }

    #[test]
    fn test_identity_returns_failure() {
        let recovery: DefaultRecovery<String, String> = DefaultRecovery::identity();
        assert!(recovery.is_bound());
        assert_eq!(recovery.recover("boom".to_string()), Some("boom".to_string()));
    }

    #[test]
    fn test_identity_converts() {
        let recovery: DefaultRecovery<i64, i32> = DefaultRecovery::identity();
        assert_eq!(recovery.recover(7), Some(7_i64));
    }

    #[test]
    fn test_custom_is_shared_by_clones() {
        let recovery: DefaultRecovery<usize, String> = DefaultRecovery::custom(|e: String| e.len());
        let copy = recovery.clone();
        assert_eq!(recovery.recover("abc".into()), Some(3));
        assert_eq!(copy.recover("abcd".into()), Some(4));
        assert_eq!(format!("{copy:?}"), "DefaultRecovery::custom");
    }
}
