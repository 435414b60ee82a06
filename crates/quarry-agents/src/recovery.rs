//! Best-effort recovery from registry unavailability.
//!
//! Every core operation that touches the registry can hit
//! `TransformUnavailable`.  None of them are allowed to surface it: the
//! simulation favours liveness over strict pose correctness, so the policy
//! is log, pause one fixed recovery interval (to let asynchronous
//! propagation catch up), then proceed with whatever stale or default value
//! the caller has on hand.
//!
//! The policy lives in its own object so it can be exercised against an
//! always-failing store without involving any real lookup machinery.

use std::time::Duration;

use quarry_types::QuarryError;
use tracing::warn;

/// Fixed pause applied after a failed lookup before proceeding degraded.
pub const DEFAULT_RECOVERY_PAUSE: Duration = Duration::from_millis(100);

/// The log + pause half of the degrade policy.  The fallback value is the
/// caller's: whatever stale pose it last cached, or the identity.
#[derive(Debug, Clone, Copy)]
pub struct BestEffort {
    pause: Duration,
}

impl Default for BestEffort {
    fn default() -> Self {
        Self {
            pause: DEFAULT_RECOVERY_PAUSE,
        }
    }
}

impl BestEffort {
    /// Create a policy with a custom recovery pause.  Useful range is
    /// roughly 100 ms to 1 s; tests shrink it to keep runs fast.
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }

    /// The configured recovery pause.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Absorb a lookup failure: log it and wait out the recovery interval.
    /// Always returns; never re-raises.
    pub async fn absorb(&self, err: &QuarryError) {
        warn!(error = %err, "transform lookup degraded; continuing best-effort");
        tokio::time::sleep(self.pause).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn default_pause_is_one_recovery_interval() {
        assert_eq!(BestEffort::default().pause(), DEFAULT_RECOVERY_PAUSE);
    }

    #[tokio::test]
    async fn absorb_returns_within_a_bounded_interval() {
        let policy = BestEffort::new(Duration::from_millis(10));
        let err = QuarryError::unavailable("/map", "pdias", "offline");

        let start = Instant::now();
        policy.absorb(&err).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(10));
        assert!(
            elapsed < Duration::from_millis(500),
            "recovery must be bounded, took {elapsed:?}"
        );
    }
}
