//! In-process transform registry.
//!
//! [`LocalPoseStore`] keeps the latest [`StampedPose`] per frame behind a
//! [`tokio::sync::RwLock`].  Clone it cheaply – all clones share the same
//! underlying map, so every agent in the process sees the same registry.
//!
//! # Eventual consistency
//!
//! With the default zero propagation delay a publish applies synchronously,
//! which keeps tests deterministic.  Configuring a delay via
//! [`LocalPoseStore::with_propagation_delay`] defers every apply onto a
//! spawned task, reproducing the read-after-write visibility lag of a
//! distributed registry: a lookup racing a publish observes the previous
//! value, or fails with `TransformUnavailable` when the frame has never
//! propagated.
//!
//! Applies are stamp-monotonic per frame: a deferred apply never overwrites
//! a newer record, so within one publisher later poses always win.
//!
//! # Example
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use quarry_registry::{LocalPoseStore, PoseStore};
//! use quarry_types::{Pose, Quat, Vec3, WORLD_FRAME};
//!
//! let store = LocalPoseStore::new();
//! let pose = Pose::new(Vec3::new(1.0, 0.0, 0.0), Quat::identity());
//! store.publish("pdias", pose, chrono::Utc::now()).await.unwrap();
//!
//! let found = store
//!     .lookup(WORLD_FRAME, "pdias", chrono::Utc::now())
//!     .await
//!     .unwrap();
//! assert!((found.position.x - 1.0).abs() < 1e-12);
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use quarry_types::{Pose, QuarryError, StampedPose, WORLD_FRAME};

use crate::store::PoseStore;

type FrameMap = HashMap<String, StampedPose>;

/// Shared in-process registry.  Cheap to clone; clones share the frame map.
#[derive(Debug, Clone, Default)]
pub struct LocalPoseStore {
    frames: Arc<RwLock<FrameMap>>,
    propagation_delay: Duration,
}

impl LocalPoseStore {
    /// Create an empty store with synchronous (zero-delay) publishes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose publishes become visible only after
    /// `delay`, simulating asynchronous propagation between publishers and
    /// readers.
    pub fn with_propagation_delay(delay: Duration) -> Self {
        Self {
            frames: Arc::new(RwLock::new(HashMap::new())),
            propagation_delay: delay,
        }
    }

    /// Number of frames that have propagated into the store.
    pub async fn frame_count(&self) -> usize {
        self.frames.read().await.len()
    }
}

/// Write `record` into the map unless a newer stamp is already present.
async fn apply(frames: &RwLock<FrameMap>, frame: String, record: StampedPose) {
    let mut map = frames.write().await;
    match map.get(&frame) {
        Some(existing) if existing.stamp > record.stamp => {
            debug!(frame = %frame, "discarding stale publish");
        }
        _ => {
            map.insert(frame, record);
        }
    }
}

#[async_trait]
impl PoseStore for LocalPoseStore {
    async fn publish(
        &self,
        frame: &str,
        pose: Pose,
        stamp: DateTime<Utc>,
    ) -> Result<(), QuarryError> {
        let record = StampedPose::new(pose, stamp);
        if self.propagation_delay.is_zero() {
            apply(&self.frames, frame.to_string(), record).await;
        } else {
            let frames = Arc::clone(&self.frames);
            let frame = frame.to_string();
            let delay = self.propagation_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                apply(&frames, frame, record).await;
            });
        }
        Ok(())
    }

    async fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        _at: DateTime<Utc>,
    ) -> Result<Pose, QuarryError> {
        if target_frame == source_frame {
            return Ok(Pose::identity());
        }

        let frames = self.frames.read().await;
        let resolve = |frame: &str| -> Result<Pose, QuarryError> {
            if frame == WORLD_FRAME {
                return Ok(Pose::identity());
            }
            frames.get(frame).map(|record| record.pose).ok_or_else(|| {
                QuarryError::unavailable(
                    target_frame,
                    source_frame,
                    format!("frame {frame:?} has not published yet"),
                )
            })
        };

        let world_target = resolve(target_frame)?;
        let world_source = resolve(source_frame)?;

        // T(target <- source) = T(world <- target)^-1 * T(world <- source)
        Ok(world_target.inverse().compose(world_source))
    }
}
