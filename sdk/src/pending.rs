use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use qualtive_core::GeneralError;
use tokio::task::JoinHandle;

use crate::cancel::CancellationToken;

/// An operation running on the tokio runtime.
///
/// Resolves exactly once with the operation's result. Dropping it does not
/// stop the work.
#[must_use = "the result is only observable by awaiting"]
pub struct Pending<T, E> {
    handle: JoinHandle<Result<T, E>>,
    cancel: CancellationToken,
}

impl<T, E> Pending<T, E>
where
    T: Send + 'static,
    E: From<GeneralError> + Send + 'static,
{
    pub(crate) fn spawn<F, Fut>(task: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        Self {
            handle: tokio::spawn(task(cancel.clone())),
            cancel,
        }
    }

    /// Stop before the next request goes out.
    ///
    /// If nothing has been sent yet the operation resolves to
    /// [`GeneralError::Cancelled`]. A request already on the wire finishes and
    /// its real outcome is delivered.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T, E> Future for Pending<T, E>
where
    E: From<GeneralError>,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(GeneralError::Cancelled.into()),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        })
    }
}

impl<T, E> fmt::Debug for Pending<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("finished", &self.handle.is_finished())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
