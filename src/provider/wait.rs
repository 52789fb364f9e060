//! Bounded polling for writes that providers publish eventually.
//!
//! Providers acknowledge a create call before the created resource is
//! readable. [`wait_until`] re-runs a read probe on a fixed cadence until it
//! succeeds or the bound runs out.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use super::error::ProviderError;

/// Default delay between probes.
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(1);

/// Default bound on the total wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Probe cadence and bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    interval: Duration,
    timeout: Duration,
}

impl WaitPolicy {
    /// Creates a policy probing every `interval` for at most `timeout`.
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Delay between probes.
    #[must_use]
    pub const fn interval(self) -> Duration {
        self.interval
    }

    /// Bound on the total wait.
    #[must_use]
    pub const fn timeout(self) -> Duration {
        self.timeout
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_TIMEOUT)
    }
}

/// Runs `probe` until it succeeds or `policy.timeout()` elapses.
///
/// The first probe runs immediately; later probes follow `policy.interval()`
/// apart. The bound is checked after each sleep, so a probe that fails `n`
/// times succeeds overall whenever `n * interval < timeout`.
///
/// # Errors
///
/// Returns [`ProviderError::Timeout`] naming `operation` and carrying the last
/// probe error once the bound is exhausted.
pub async fn wait_until<Probe, Attempt>(
    policy: WaitPolicy,
    operation: &str,
    mut probe: Probe,
) -> Result<(), ProviderError>
where
    Probe: FnMut() -> Attempt,
    Attempt: Future<Output = Result<(), ProviderError>>,
{
    let started = Instant::now();

    loop {
        let error = match probe().await {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };

        debug!(
            operation,
            %error,
            retry_in = ?policy.interval,
            "probe failed, retrying"
        );
        sleep(policy.interval).await;

        if started.elapsed() >= policy.timeout {
            return Err(ProviderError::Timeout {
                operation: operation.to_owned(),
                timeout: policy.timeout,
                last_error: Box::new(error),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;
    use tokio::time::Instant;

    use super::{WaitPolicy, wait_until};
    use crate::provider::error::ProviderError;

    fn not_yet(attempt: u32) -> ProviderError {
        ProviderError::NotFound {
            message: format!("attempt {attempt}"),
        }
    }

    #[rstest]
    #[case::immediate(0)]
    #[case::after_three_failures(3)]
    #[case::just_inside_bound(4)]
    #[tokio::test(start_paused = true)]
    async fn succeeds_once_probe_recovers_within_bound(#[case] failures: u32) {
        let policy = WaitPolicy::new(Duration::from_secs(1), Duration::from_secs(5));
        let mut attempts = 0_u32;

        let result = wait_until(policy, "repository creation", || {
            attempts += 1;
            let attempt = attempts;
            async move {
                if attempt <= failures {
                    Err(not_yet(attempt))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok(), "expected success, got {result:?}");
        assert_eq!(attempts, failures + 1, "probe count");
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_with_last_probe_error() {
        let policy = WaitPolicy::new(Duration::from_secs(1), Duration::from_secs(5));
        let started = Instant::now();
        let mut attempts = 0_u32;

        let result = wait_until(policy, "deploy key upload", || {
            attempts += 1;
            let attempt = attempts;
            async move { Err(not_yet(attempt)) }
        })
        .await;

        assert_eq!(attempts, 5, "probe count");
        assert!(started.elapsed() >= Duration::from_secs(5), "waited the bound");
        match result {
            Err(ProviderError::Timeout {
                operation,
                timeout,
                last_error,
            }) => {
                assert_eq!(operation, "deploy key upload");
                assert_eq!(timeout, Duration::from_secs(5));
                assert_eq!(*last_error, not_yet(5));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failing_past_bound_is_not_retried_further() {
        let policy = WaitPolicy::new(Duration::from_secs(1), Duration::from_secs(5));
        let mut attempts = 0_u32;

        let result = wait_until(policy, "repository creation", || {
            attempts += 1;
            let attempt = attempts;
            async move {
                if attempt <= 5 {
                    Err(not_yet(attempt))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(
            matches!(result, Err(ProviderError::Timeout { .. })),
            "expected timeout, got {result:?}"
        );
        assert_eq!(attempts, 5, "no probe after the bound");
    }

    #[rstest]
    fn default_policy_matches_documented_values() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.interval(), Duration::from_secs(1));
        assert_eq!(policy.timeout(), Duration::from_secs(30));
    }
}
