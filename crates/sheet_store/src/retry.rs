use rand::{RngExt, rng};
use std::time::Duration;

use crate::SheetStoreError;

/// Exponential backoff with jitter for store reads. Only errors the store
/// classifies as retryable (transport failures, 5xx) are retried.
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub async fn run<F, Fut, T>(&self, mut f: F) -> Result<T, SheetStoreError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SheetStoreError>>,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !e.is_retryable() {
                        return Err(e);
                    }
                    let max_delay = self.base_delay * (1u32 << attempt);
                    let jitter = rng().random_range(0..max_delay.as_millis().max(1) as u64);
                    tokio::time::sleep(Duration::from_millis(jitter)).await;
                }
            }
        }
    }
}
