use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Delays between attempts of a remote call.
///
/// An empty policy makes exactly one attempt, so failures surface at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl RetryPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self { delays: Vec::new() }
    }

    #[must_use]
    pub fn from_secs(delays: &[u64]) -> Self {
        Self {
            delays: delays.iter().copied().map(Duration::from_secs).collect(),
        }
    }

    #[must_use]
    pub const fn from_durations(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }
}

/// Run `operation`, retrying after each configured delay.
///
/// # Returns
/// The first successful result, or the error of the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts();

    for (i, delay) in policy.delays.iter().enumerate() {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                warn!(
                    "Request failed (attempt {}/{attempts}): {e}. Retrying after {:.1}s...",
                    i + 1,
                    delay.as_secs_f32()
                );
                sleep(*delay).await;
            }
        }
    }

    operation().await
}
