//! Submit-then-poll helper for long-running provider jobs.
//!
//! Image and video backends typically accept a job, hand back an id and
//! expect the client to poll until the job settles. This loop owns the
//! cadence and the deadline; the caller supplies the status check.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus<T> {
    Processing,
    Completed(T),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Pause between checks.
    #[serde(with = "millis")]
    pub interval: Duration,
    /// Overall deadline, measured from the first check.
    #[serde(with = "millis")]
    pub timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollingConfig {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Call `check` until it reports a terminal status or the deadline passes.
///
/// Returns the completed payload, `LlmError::ProviderError` when the job
/// failed, `LlmError::TimeoutError` at the deadline. Errors from `check`
/// itself end the loop unchanged.
pub async fn poll_until_complete<T, F, Fut>(
    provider: &str,
    config: &PollingConfig,
    mut check: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, LlmError>>,
{
    let start = tokio::time::Instant::now();
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match check().await? {
            PollStatus::Completed(value) => {
                tracing::debug!(provider, attempts, "job completed");
                return Ok(value);
            }
            PollStatus::Failed(reason) => {
                tracing::debug!(provider, attempts, %reason, "job failed");
                return Err(LlmError::provider_error(provider, reason));
            }
            PollStatus::Processing => {}
        }

        let elapsed = start.elapsed();
        if elapsed + config.interval > config.timeout {
            return Err(LlmError::TimeoutError(format!(
                "{provider} job still processing after {attempts} checks ({}ms)",
                elapsed.as_millis()
            )));
        }
        tracing::trace!(provider, attempts, "job processing");
        tokio::time::sleep(config.interval).await;
    }
}
