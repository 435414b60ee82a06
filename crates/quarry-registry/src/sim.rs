//! Deliberately degraded stores for headless testing.
//!
//! The best-effort recovery path in `quarry-agents` only triggers when the
//! registry misbehaves, so these stores make the misbehaviour reproducible
//! without any real propagation machinery:
//!
//! - [`UnavailableStore`] – every lookup fails, forever.  Models a frame
//!   pair that never resolves (a publisher that never came up).
//! - [`FlakyStore`] – wraps a working store and cuts it off on demand.
//!   Models an outage window after a period of healthy operation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quarry_types::{Pose, QuarryError};

use crate::store::PoseStore;

// ────────────────────────────────────────────────────────────────────────────
// UnavailableStore
// ────────────────────────────────────────────────────────────────────────────

/// A registry whose lookups never resolve.
///
/// Publishes are accepted (and counted) but go nowhere, matching the
/// fire-and-forget publish contract.  Lookup calls are counted so tests can
/// assert that a degraded caller actually reached the store instead of
/// short-circuiting.
#[derive(Debug, Default)]
pub struct UnavailableStore {
    lookups: AtomicUsize,
    publishes: AtomicUsize,
}

impl UnavailableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PoseStore for UnavailableStore {
    async fn publish(
        &self,
        _frame: &str,
        _pose: Pose,
        _stamp: DateTime<Utc>,
    ) -> Result<(), QuarryError> {
        self.publishes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        _at: DateTime<Utc>,
    ) -> Result<Pose, QuarryError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Err(QuarryError::unavailable(
            target_frame,
            source_frame,
            "registry offline",
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FlakyStore
// ────────────────────────────────────────────────────────────────────────────

/// Wraps an inner store and cuts its availability at runtime.
///
/// While unavailable, lookups fail with `TransformUnavailable` and publishes
/// are dropped (the inner store never sees them) – the silent degradation a
/// caller of a fire-and-forget publish has to tolerate.
pub struct FlakyStore {
    inner: Arc<dyn PoseStore>,
    available: AtomicBool,
    dropped_publishes: AtomicUsize,
}

impl FlakyStore {
    /// Wrap `inner`, starting in the available state.
    pub fn new(inner: Arc<dyn PoseStore>) -> Self {
        Self {
            inner,
            available: AtomicBool::new(true),
            dropped_publishes: AtomicUsize::new(0),
        }
    }

    /// Toggle availability.  Takes effect on the next call.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Publishes silently dropped while unavailable.
    pub fn dropped_publish_count(&self) -> usize {
        self.dropped_publishes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PoseStore for FlakyStore {
    async fn publish(
        &self,
        frame: &str,
        pose: Pose,
        stamp: DateTime<Utc>,
    ) -> Result<(), QuarryError> {
        if !self.is_available() {
            self.dropped_publishes.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        self.inner.publish(frame, pose, stamp).await
    }

    async fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        at: DateTime<Utc>,
    ) -> Result<Pose, QuarryError> {
        if !self.is_available() {
            return Err(QuarryError::unavailable(
                target_frame,
                source_frame,
                "registry unreachable",
            ));
        }
        self.inner.lookup(target_frame, source_frame, at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalPoseStore;
    use quarry_types::{Quat, Vec3, WORLD_FRAME};

    #[tokio::test]
    async fn unavailable_store_fails_every_lookup() {
        let store = UnavailableStore::new();
        for _ in 0..3 {
            let result = store.lookup(WORLD_FRAME, "pdias", Utc::now()).await;
            assert!(matches!(result, Err(QuarryError::TransformUnavailable { .. })));
        }
        assert_eq!(store.lookup_count(), 3);
    }

    #[tokio::test]
    async fn unavailable_store_accepts_publishes_silently() {
        let store = UnavailableStore::new();
        store
            .publish("pdias", Pose::identity(), Utc::now())
            .await
            .unwrap();
        assert_eq!(store.publish_count(), 1);
        // The publish went nowhere: the frame still never resolves.
        assert!(store.lookup(WORLD_FRAME, "pdias", Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn flaky_store_passes_through_while_available() {
        let flaky = FlakyStore::new(Arc::new(LocalPoseStore::new()));
        let pose = Pose::new(Vec3::new(2.0, 0.0, 0.0), Quat::identity());
        flaky.publish("pdias", pose, Utc::now()).await.unwrap();

        let found = flaky.lookup(WORLD_FRAME, "pdias", Utc::now()).await.unwrap();
        assert!((found.position.x - 2.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn flaky_store_cuts_lookups_when_unavailable() {
        let flaky = FlakyStore::new(Arc::new(LocalPoseStore::new()));
        flaky
            .publish("pdias", Pose::identity(), Utc::now())
            .await
            .unwrap();

        flaky.set_available(false);
        assert!(flaky.lookup(WORLD_FRAME, "pdias", Utc::now()).await.is_err());

        flaky.set_available(true);
        assert!(flaky.lookup(WORLD_FRAME, "pdias", Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn flaky_store_drops_publishes_when_unavailable() {
        let flaky = FlakyStore::new(Arc::new(LocalPoseStore::new()));
        flaky.set_available(false);
        flaky
            .publish("pdias", Pose::identity(), Utc::now())
            .await
            .unwrap();
        assert_eq!(flaky.dropped_publish_count(), 1);

        // The dropped publish never reached the inner store.
        flaky.set_available(true);
        assert!(flaky.lookup(WORLD_FRAME, "pdias", Utc::now()).await.is_err());
    }
}
