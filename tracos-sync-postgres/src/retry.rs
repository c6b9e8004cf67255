//! Store Retry Policy
//!
//! Every TracOS store call gets a fixed number of immediate retries. When the
//! last attempt fails the policy runs its exhausted action, which in the
//! binary terminates the process: once the store is unreachable, carrying on
//! would only leave partial progress behind.

use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

use tracos_sync_api::{StoreError, StoreResult};

/// Action run once every attempt of an operation has failed.
pub type ExhaustedAction = Arc<dyn Fn(&str, &StoreError) + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    retries: u32,
    on_exhausted: ExhaustedAction,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, on_exhausted: ExhaustedAction) -> Self {
        Self {
            retries,
            on_exhausted,
        }
    }

    /// One immediate retry, then `on_exhausted`.
    pub fn fail_fast<F>(on_exhausted: F) -> Self
    where
        F: Fn(&str, &StoreError) + Send + Sync + 'static,
    {
        Self::new(1, Arc::new(on_exhausted))
    }

    /// [`RetryPolicy::fail_fast`] terminating the process with exit code 1.
    pub fn exit_process() -> Self {
        Self::fail_fast(|operation, err| {
            error!(operation, error = %err, "TracOS store unavailable, terminating");
            std::process::exit(1);
        })
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Run `attempt` until it succeeds or the attempts are used up.
    ///
    /// Retries happen immediately, without backoff. If the exhausted action
    /// returns (it does not in production), the last error is handed back
    /// wrapped in [`StoreError::Unavailable`].
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut attempt: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempts = 0;
        loop {
            attempts += 1;
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if attempts < max_attempts => {
                    warn!(operation, attempt = attempts, error = %err, "Store operation failed, retrying");
                }
                Err(err) => {
                    error!(operation, attempts, error = %err, "Store operation failed on every attempt");
                    (self.on_exhausted)(operation, &err);
                    return Err(StoreError::Unavailable {
                        operation: operation.to_string(),
                        attempts,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
