use crate::core::error::{Error, Result};
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Completion handle of a scheduled evaluation.
///
/// Awaiting it yields the evaluation result. The work itself is already
/// running: dropping the handle detaches it, it does not cancel it.
pub struct Pending<T> {
    task: JoinHandle<Result<T>>,
    runtime: Handle,
}

impl<T: Send + 'static> Pending<T> {
    pub(crate) fn new(task: JoinHandle<Result<T>>, runtime: Handle) -> Self {
        Self { task, runtime }
    }

    /// A handle that is already resolved with `result`.
    pub fn ready(runtime: &Handle, result: Result<T>) -> Self {
        Self::new(runtime.spawn(async move { result }), runtime.clone())
    }

    /// Runs `continuation` once the value is available.
    ///
    /// The continuation is skipped when the evaluation fails; the failure is
    /// forwarded to the returned handle instead.
    pub fn then<U, F>(self, continuation: F) -> Pending<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.and_then(move |value| Ok(continuation(value)))
    }

    /// Like [`then`](Pending::then) for continuations that can fail.
    pub fn and_then<U, F>(self, continuation: F) -> Pending<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let runtime = self.runtime.clone();
        let task = runtime.spawn(async move { continuation(self.await?) });
        Pending::new(task, runtime)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.task.poll_unpin(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(join_error) => {
                log::error!("An evaluation task failed: {:?}", join_error);
                Err(Error::WorkerFailed(join_error.to_string()))
            }
        })
    }
}
