use crate::{Result, TankobonError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Per-site politeness budget
///
/// Bounds the number of requests in flight and spaces request starts at least `delay`
/// apart.
#[derive(Debug)]
pub struct Throttle {
    semaphore: Arc<Semaphore>,
    delay: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a throttle
    ///
    /// # Arguments
    ///
    /// * `parallelism` - Maximum concurrent requests (at least 1)
    /// * `delay` - Minimum time between two request starts
    pub fn new(parallelism: usize, delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(parallelism.max(1))),
            delay,
            last_start: Mutex::new(None),
        }
    }

    /// Waits until a request may start
    ///
    /// The request slot is held until the returned permit is dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| TankobonError::Task(e.to_string()))?;

        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            let ready_at = previous + self.delay;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_start = Some(Instant::now());

        Ok(permit)
    }

    /// Number of request slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
