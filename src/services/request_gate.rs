//! Debounced, cancelable wrapper around a single data request.
//!
//! A [`RequestGate`] waits for a fixed delay before starting its request and
//! can be aborted at any point before it settles. Exactly one of success,
//! abort, or failure is reported, and the request factory runs at most once
//! (never, if the gate is aborted during the delay).
//!
//! Aborting an in-flight request drops its future. That is best-effort: the
//! remote side may still finish the work, but the result is never reported.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Delay before a gated request is started.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Lifecycle stage at which a gate was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortStage {
    /// Aborted while waiting for the delay; the request never started.
    Timer,
    /// Aborted while the request was in flight.
    Request,
}

impl fmt::Display for AbortStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer => f.write_str("aborted timer"),
            Self::Request => f.write_str("aborted request"),
        }
    }
}

/// Why a gate did not produce a value.
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The gate was aborted before it settled.
    #[error("{0}")]
    Aborted(AbortStage),

    /// The request itself failed.
    #[error("request failed: {0}")]
    Failed(E),
}

impl<E> GateError<E> {
    /// Returns true if the gate was aborted rather than failed.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    /// Returns the underlying request error, if the request failed.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Aborted(_) => None,
        }
    }
}

/// Result of awaiting a gate.
pub type GateResult<T, E> = Result<T, GateError<E>>;

/// Cloneable handle that aborts a gate without owning it.
#[derive(Debug, Clone)]
pub struct GateAbortHandle {
    token: CancellationToken,
}

impl GateAbortHandle {
    /// Aborts the gate. Idempotent; a no-op once the gate has settled.
    pub fn abort(&self) {
        self.token.cancel();
    }

    /// Returns whether abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A single-use, debounced, cancelable request.
///
/// Await the gate (it implements [`IntoFuture`]) to drive the delay and
/// the request. Use [`abort_handle`](Self::abort_handle) to cancel it from
/// elsewhere.
///
/// # Example
///
/// ```ignore
/// let gate = RequestGate::with_default_delay(move || client.fetch_page(query));
/// let handle = gate.abort_handle();
/// // ...later, when a newer request supersedes this one
/// handle.abort();
/// assert!(gate.await.unwrap_err().is_aborted());
/// ```
pub struct RequestGate<T, E> {
    token: CancellationToken,
    future: BoxFuture<'static, GateResult<T, E>>,
}

impl<T, E> RequestGate<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Creates a gate that starts `factory()` once `delay` has elapsed
    /// without an abort.
    pub fn new<F, Fut>(factory: F, delay: Duration) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let future = async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    debug!("request aborted during delay");
                    return Err(GateError::Aborted(AbortStage::Timer));
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let request = factory();
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    debug!("request aborted in flight");
                    Err(GateError::Aborted(AbortStage::Request))
                }
                result = request => result.map_err(GateError::Failed),
            }
        }
        .boxed();

        Self { token, future }
    }

    /// Creates a gate with [`DEFAULT_REQUEST_DELAY`].
    pub fn with_default_delay<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::new(factory, DEFAULT_REQUEST_DELAY)
    }
}

impl<T, E> RequestGate<T, E> {
    /// Aborts the gate. Idempotent; a no-op once the gate has settled.
    pub fn abort(&self) {
        self.token.cancel();
    }

    /// Returns whether abort has been requested.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns a handle that can abort this gate after it has been moved
    /// into a task.
    pub fn abort_handle(&self) -> GateAbortHandle {
        GateAbortHandle {
            token: self.token.clone(),
        }
    }
}

impl<T, E> IntoFuture for RequestGate<T, E> {
    type Output = GateResult<T, E>;
    type IntoFuture = BoxFuture<'static, GateResult<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<T, E> fmt::Debug for RequestGate<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestGate")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}
