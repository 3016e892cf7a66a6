//! The finalized, already-running outcome of a sequence.

use super::DefaultRecovery;
use crate::errors::SequencerError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};
use uuid::Uuid;

/// How `guarantee` should recover a failed run.
pub enum Fallback<T, E> {
    /// Use this one-off handler.
    With(Box<dyn FnOnce(E) -> T + Send>),
    /// Use the default recovery bound when the sequencer was constructed.
    Default,
}

impl<T, E> Fallback<T, E> {
    /// Wraps a one-off recovery handler.
    pub fn with<F>(recover: F) -> Self
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        Self::With(Box::new(recover))
    }
}

impl<T, E> fmt::Debug for Fallback<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::With(_) => f.write_str("Fallback::With(..)"),
            Self::Default => f.write_str("Fallback::Default"),
        }
    }
}

/// A sequence run that has already started.
///
/// Awaiting it yields the run's outcome: the aggregation value, the
/// aggregated recovered value, or the raw failure. Dropping it does not stop
/// the run.
pub struct Finalized<T, E> {
    handle: JoinHandle<Result<T, E>>,
    default_recovery: DefaultRecovery<T, E>,
    run_id: Uuid,
}

impl<T, E> Finalized<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) const fn new(
        handle: JoinHandle<Result<T, E>>,
        default_recovery: DefaultRecovery<T, E>,
        run_id: Uuid,
    ) -> Self {
        Self {
            handle,
            default_recovery,
            run_id,
        }
    }

    /// Returns the id of this run, as reported in events and spans.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns true once the run has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the run and returns its outcome.
    pub async fn outcome(self) -> Result<T, E> {
        self.await
    }

    /// Waits for the run and always produces a value.
    ///
    /// A successful run returns its value untouched and the fallback is never
    /// invoked. A failed run is passed to the fallback.
    ///
    /// # Errors
    ///
    /// Returns `SequencerError::MissingDefaultRecovery` when the run failed,
    /// `Fallback::Default` was requested, and the sequencer was built without
    /// a default recovery.
    pub async fn guarantee(self, fallback: Fallback<T, E>) -> Result<T, SequencerError> {
        let run_id = self.run_id;
        let default_recovery = self.default_recovery.clone();

        let failure = match self.await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        match fallback {
            Fallback::With(recover) => {
                debug!(%run_id, "Guarantee recovered failure with explicit handler");
                Ok(recover(failure))
            }
            Fallback::Default => match default_recovery.recover(failure) {
                Some(value) => {
                    debug!(%run_id, recovery = default_recovery.kind(), "Guarantee recovered failure with default handler");
                    Ok(value)
                }
                None => {
                    warn!(%run_id, "Guarantee requested the default recovery but none is bound");
                    Err(SequencerError::MissingDefaultRecovery)
                }
            },
        }
    }

    /// Waits for the run and recovers any failure with `recover`.
    pub async fn guarantee_with<F>(self, recover: F) -> T
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        match self.await {
            Ok(value) => value,
            Err(failure) => recover(failure),
        }
    }
}

/// Re-raises a panic from the run on the awaiting task.
fn resume_join_error(run_id: Uuid, err: JoinError) -> ! {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    // Runs are never aborted; a cancelled join means the runtime shut down.
    panic!("sequence run {run_id} was dropped by its runtime before settling: {err}");
}

impl<T, E> Future for Finalized<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(err)) => resume_join_error(this.run_id, err),
        }
    }
}

impl<T, E> fmt::Debug for Finalized<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finalized")
            .field("run_id", &self.run_id)
            .field("default_recovery", &self.default_recovery)
            .field("settled", &self.handle.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(outcome: Result<i64, String>, recovery: DefaultRecovery<i64, String>) -> Finalized<i64, String> {
        Finalized::new(tokio::spawn(async move { outcome }), recovery, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_await_yields_outcome() {
        assert_eq!(spawned(Ok(5), DefaultRecovery::None).await, Ok(5));
        assert_eq!(
            spawned(Err("boom".into()), DefaultRecovery::None).outcome().await,
            Err("boom".to_string())
        );
    }

    #[tokio::test]
    async fn test_guarantee_success_skips_handler() {
        let value = spawned(Ok(5), DefaultRecovery::None)
            .guarantee(Fallback::with(|_: String| -> i64 { panic!("handler must not run") }))
            .await;
        assert_eq!(value, Ok(5));
    }

    #[tokio::test]
    async fn test_guarantee_success_with_unbound_default() {
        let value = spawned(Ok(5), DefaultRecovery::None)
            .guarantee(Fallback::Default)
            .await;
        assert_eq!(value, Ok(5));
    }

    #[tokio::test]
    async fn test_guarantee_explicit_handler() {
        let value = spawned(Err("four".into()), DefaultRecovery::None)
            .guarantee(Fallback::with(|e: String| e.len() as i64))
            .await;
        assert_eq!(value, Ok(4));
    }

    #[tokio::test]
    async fn test_guarantee_default_handler() {
        let recovery = DefaultRecovery::custom(|e: String| -(e.len() as i64));
        let value = spawned(Err("abc".into()), recovery)
            .guarantee(Fallback::Default)
            .await;
        assert_eq!(value, Ok(-3));
    }

    #[tokio::test]
    async fn test_guarantee_default_missing() {
        let err = spawned(Err("abc".into()), DefaultRecovery::None)
            .guarantee(Fallback::Default)
            .await
            .unwrap_err();
        assert_eq!(err, SequencerError::MissingDefaultRecovery);
    }

    #[tokio::test]
    async fn test_guarantee_with() {
        let value = spawned(Err("abc".into()), DefaultRecovery::None)
            .guarantee_with(|_| 0)
            .await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    #[should_panic(expected = "task exploded")]
    async fn test_panics_resume_on_awaiter() {
        let finalized: Finalized<i64, String> = Finalized::new(
            tokio::spawn(async {
                let explode = true;
                if explode {
                    panic!("task exploded");
                }
                Ok(0)
            }),
            DefaultRecovery::None,
            Uuid::new_v4(),
        );
        let _ = finalized.await;
    }

    #[tokio::test]
    async fn test_debug_and_run_id() {
        let finalized = spawned(Ok(1), DefaultRecovery::None);
        let run_id = finalized.run_id();
        assert!(format!("{finalized:?}").contains(&run_id.to_string()));
        let _ = finalized.await;
    }
}
