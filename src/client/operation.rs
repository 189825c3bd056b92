//! Cancellable handles for long-running backend calls.
//!
//! The call runs as its own tokio task. Aborting the task drops the in-flight
//! RPC future, which tells tarpc to cancel the request, so a call that ran out
//! of budget never completes behind the caller's back.

use crate::client::{ClientError, ClientResult};
use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

/// A backend call in flight.
///
/// Dropping an unfinished handle aborts the call.
pub struct OperationHandle<T> {
    operation: String,
    task: JoinHandle<ClientResult<T>>,
}

impl<T: Send + 'static> OperationHandle<T> {
    /// Starts `call` on the runtime. `operation` names it in errors and logs.
    pub fn spawn<F>(operation: impl Into<String>, call: F) -> Self
    where
        F: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let operation = operation.into();
        tracing::debug!(operation = %operation, "starting backend operation");
        Self {
            operation,
            task: tokio::spawn(call),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Aborts the call. A later `wait` reports `Cancelled`.
    pub fn cancel(&self) {
        tracing::debug!(operation = %self.operation, "cancelling backend operation");
        self.task.abort();
    }

    /// Waits for the call without a budget.
    pub async fn wait(mut self) -> ClientResult<T> {
        let joined = (&mut self.task).await;
        self.finish(joined)
    }

    /// Waits up to `budget`. On expiry the call is aborted and `TimedOut`
    /// is returned, whatever the backend would have answered later.
    pub async fn wait_timeout(mut self, budget: Duration) -> ClientResult<T> {
        match tokio::time::timeout(budget, &mut self.task).await {
            Ok(joined) => self.finish(joined),
            Err(_) => {
                self.task.abort();
                tracing::warn!(
                    operation = %self.operation,
                    budget_ms = budget.as_millis() as u64,
                    "backend operation exceeded its budget; aborted"
                );
                Err(ClientError::TimedOut {
                    operation: self.operation.clone(),
                    after: budget,
                })
            }
        }
    }

    fn finish(&self, joined: Result<ClientResult<T>, JoinError>) -> ClientResult<T> {
        match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClientError::Cancelled {
                operation: self.operation.clone(),
            }),
            Err(e) => Err(ClientError::Transport {
                message: format!("{} task failed: {}", self.operation, e),
            }),
        }
    }
}

impl<T> Drop for OperationHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/operation_tests.rs"]
mod tests;
