//! The `PoseStore` seam.
//!
//! Agents never talk to a concrete transform registry.  They hold an
//! `Arc<dyn PoseStore>` and publish/look up through the trait, so the
//! registry can be swapped for an in-process store, a networked one, or a
//! deliberately broken one in tests without touching agent logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quarry_types::{Pose, QuarryError};

/// A shared, eventually-consistent store mapping a frame name to its most
/// recent pose relative to the world frame
/// [`"/map"`][quarry_types::WORLD_FRAME].
///
/// # Contract
///
/// * `publish` – replace the latest pose for `frame`.  Fire-and-forget: a
///   store may defer the apply, so a lookup racing a publish can still see
///   the old value.  There is no read-after-write guarantee across the
///   publish/lookup boundary, only per-frame stamp ordering once propagation
///   completes.
///
/// * `lookup` – the pose of `source_frame` expressed in `target_frame`
///   coordinates, approximately at `at`.  Fails with
///   [`QuarryError::TransformUnavailable`] while either frame has not
///   propagated.  Implementations must return within a bounded interval;
///   callers are entitled to assume a lookup never hangs.
#[async_trait]
pub trait PoseStore: Send + Sync {
    /// Replace the latest pose of `frame`, relative to the world frame.
    async fn publish(
        &self,
        frame: &str,
        pose: Pose,
        stamp: DateTime<Utc>,
    ) -> Result<(), QuarryError>;

    /// Resolve the pose of `source_frame` expressed in `target_frame`
    /// coordinates.  `at` is a best-effort hint; stores that hold only the
    /// latest value per frame answer with that value.
    async fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        at: DateTime<Utc>,
    ) -> Result<Pose, QuarryError>;
}
