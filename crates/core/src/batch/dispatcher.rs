//! Batch dispatch engine
//!
//! Runs one registered operation over many parameter sets concurrently and
//! pairs every outcome with the parameter set that produced it. The operation
//! name is resolved before anything is spawned, so an unknown name never
//! results in partial work.
//!
//! Outcomes are collected in completion order. With
//! [`FailurePolicy::CollectAll`] each invocation's failure stays its own;
//! with [`FailurePolicy::FailFast`] the first completed failure becomes the
//! batch error and still-running siblings are detached.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use armory_domain::{ArmoryError, BatchOptions, BatchResult, FailurePolicy, ParamSet, Result};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use crate::operations::{OperationInvoker, OperationRegistry};

/// Concurrent fan-out of one operation over many parameter sets
pub struct BatchDispatcher {
    registry: Arc<OperationRegistry>,
    invoker: Arc<dyn OperationInvoker>,
}

impl BatchDispatcher {
    pub fn new(registry: Arc<OperationRegistry>, invoker: Arc<dyn OperationInvoker>) -> Self {
        Self { registry, invoker }
    }

    /// Run `operation_name` once per parameter set.
    ///
    /// Parameter sets are passed to the operation untouched; validation is
    /// the operation's own. The result holds exactly one entry per input
    /// under [`FailurePolicy::CollectAll`].
    ///
    /// # Errors
    /// - `ArmoryError::UnknownOperation` before any work if the name is not
    ///   registered
    /// - Under [`FailurePolicy::FailFast`], the first failed outcome
    #[instrument(skip(self, parameter_sets, options), fields(count = parameter_sets.len()))]
    pub async fn dispatch(
        &self,
        operation_name: &str,
        parameter_sets: Vec<ParamSet>,
        options: BatchOptions,
    ) -> Result<BatchResult> {
        let operation = self.registry.resolve(operation_name)?;
        let total = parameter_sets.len();
        if total == 0 {
            return Ok(BatchResult::default());
        }

        let limiter = options.max_concurrency.map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        let mut pending: Vec<Option<ParamSet>> = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (index, params) in parameter_sets.into_iter().enumerate() {
            let invoker = Arc::clone(&self.invoker);
            let limiter = limiter.clone();
            let task_params = params.clone();
            pending.push(Some(params));

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => {
                            return (index, Err(ArmoryError::Internal("batch limiter closed".into())))
                        }
                    },
                    None => None,
                };

                let outcome = AssertUnwindSafe(invoker.invoke(operation, &task_params))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(ArmoryError::Internal(panic_message(&*panic))));
                (index, outcome)
            });
        }

        debug!(operation = %operation, tasks = total, "Batch dispatched");

        let mut result = BatchResult::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = match joined {
                Ok(completed) => completed,
                Err(join_error) => {
                    error!(error = %join_error, "Batch invocation task failed to join");
                    continue;
                }
            };
            let Some(params) = pending.get_mut(index).and_then(Option::take) else { continue };

            if let (FailurePolicy::FailFast, Err(err)) = (options.failure_policy, &outcome) {
                warn!(operation = %operation, error = %err, "Batch aborted on first failure");
                tasks.detach_all();
                return Err(err.clone());
            }
            result.push(params, outcome);
        }

        // Only reachable if a task was lost without reporting back.
        for params in pending.into_iter().flatten() {
            let lost = ArmoryError::Internal("invocation task did not complete".into());
            if options.failure_policy == FailurePolicy::FailFast {
                return Err(lost);
            }
            result.push(params, Err(lost));
        }

        info!(
            operation = %operation,
            succeeded = result.successes().count(),
            failed = result.failures().count(),
            "Batch completed"
        );
        Ok(result)
    }

    /// Dispatch with default options
    pub async fn dispatch_all(
        &self,
        operation_name: &str,
        parameter_sets: Vec<ParamSet>,
    ) -> Result<BatchResult> {
        self.dispatch(operation_name, parameter_sets, BatchOptions::default()).await
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("invocation panicked: {detail}")
}
