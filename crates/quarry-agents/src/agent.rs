//! [`Agent`] – a named pose in the shared world frame.
//!
//! An agent is identified by its frame name for its whole lifetime.  It can
//! resolve its own world pose and its planar distance to any other frame
//! through the injected [`PoseStore`]; both operations degrade to the last
//! known value instead of failing when the registry cannot answer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use quarry_registry::PoseStore;
use quarry_types::{Pose, QuarryError, TeamColor, WORLD_FRAME};
use tokio::sync::Mutex;

use crate::recovery::BestEffort;

/// A named participant in the pursuit.
///
/// The frame name is immutable identity; the team is assigned
/// post-construction through the validated [`set_team`][Agent::set_team]
/// setter.  The registry handle is shared – any agent may read any frame –
/// but an `Agent` by itself never writes one (only
/// [`ControlledAgent`][crate::ControlledAgent] publishes).
pub struct Agent {
    frame: String,
    team: Option<TeamColor>,
    store: Arc<dyn PoseStore>,
    recovery: BestEffort,
    /// Last successfully resolved world pose; identity until the first
    /// success.  Returned as-is while the registry is unavailable.
    last_world: Mutex<Pose>,
    /// Last successfully resolved relative pose per peer frame.
    last_relative: Mutex<HashMap<String, Pose>>,
}

impl Agent {
    /// Create an agent with no team and the default recovery policy.
    pub fn new(frame: impl Into<String>, store: Arc<dyn PoseStore>) -> Self {
        Self {
            frame: frame.into(),
            team: None,
            store,
            recovery: BestEffort::default(),
            last_world: Mutex::new(Pose::identity()),
            last_relative: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the recovery policy (builder style).
    pub fn with_recovery(mut self, recovery: BestEffort) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn team(&self) -> Option<TeamColor> {
        self.team
    }

    pub(crate) fn store(&self) -> &Arc<dyn PoseStore> {
        &self.store
    }

    /// Assign a team by label.
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::InvalidTeamLabel`] for anything outside
    /// red / green / blue; the previous assignment (or unset state) is kept.
    pub fn set_team(&mut self, label: &str) -> Result<(), QuarryError> {
        let color = label.parse::<TeamColor>()?;
        self.team = Some(color);
        Ok(())
    }

    /// This agent's pose in the world frame.
    ///
    /// On `TransformUnavailable` the failure is logged, one recovery
    /// interval is waited out, and the last known pose is returned –
    /// identity if the frame has never resolved.  Callers must tolerate an
    /// imprecise result; this never errors and never blocks unboundedly.
    pub async fn pose(&self) -> Pose {
        match self.store.lookup(WORLD_FRAME, &self.frame, Utc::now()).await {
            Ok(pose) => {
                *self.last_world.lock().await = pose;
                pose
            }
            Err(err) => {
                self.recovery.absorb(&err).await;
                *self.last_world.lock().await
            }
        }
    }

    /// Planar distance from this agent to `other`.
    pub async fn distance_to(&self, other: &Agent) -> f64 {
        self.distance_to_frame(other.frame()).await
    }

    /// Planar distance from this agent to the named frame.
    ///
    /// Resolves this agent's pose expressed in the other frame's
    /// coordinates and takes the norm of its (x, y) translation.  Under
    /// unavailability the same best-effort recovery applies, falling back to
    /// the last relative pose seen for that peer (identity before any
    /// success, which reads as distance 0.0).  Always returns a finite
    /// value; on persistent unavailability the value is best-effort and may
    /// be meaningless.
    pub async fn distance_to_frame(&self, other_frame: &str) -> f64 {
        let relative = match self
            .store
            .lookup(other_frame, &self.frame, Utc::now())
            .await
        {
            Ok(pose) => {
                self.last_relative
                    .lock()
                    .await
                    .insert(other_frame.to_string(), pose);
                pose
            }
            Err(err) => {
                self.recovery.absorb(&err).await;
                self.last_relative
                    .lock()
                    .await
                    .get(other_frame)
                    .copied()
                    .unwrap_or_else(Pose::identity)
            }
        };
        relative.planar_distance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_registry::{FlakyStore, LocalPoseStore, UnavailableStore};
    use quarry_types::{Quat, Vec3};
    use std::time::{Duration, Instant};

    fn fast_recovery() -> BestEffort {
        BestEffort::new(Duration::from_millis(5))
    }

    fn pose_at(x: f64, y: f64, yaw: f64) -> Pose {
        Pose::new(Vec3::new(x, y, 0.0), Quat::from_yaw(yaw))
    }

    // ── Team bookkeeping ───────────────────────────────────────────────────

    #[tokio::test]
    async fn set_team_accepts_recognised_labels() {
        let store = Arc::new(LocalPoseStore::new());
        let mut agent = Agent::new("pdias", store);
        assert_eq!(agent.team(), None);

        agent.set_team("blue").unwrap();
        assert_eq!(agent.team(), Some(TeamColor::Blue));
    }

    #[tokio::test]
    async fn set_team_rejects_bad_label_and_keeps_prior() {
        let store = Arc::new(LocalPoseStore::new());
        let mut agent = Agent::new("pdias", store);
        agent.set_team("red").unwrap();

        let err = agent.set_team("purple").unwrap_err();
        assert!(matches!(err, QuarryError::InvalidTeamLabel(_)));
        assert_eq!(agent.team(), Some(TeamColor::Red), "prior team must survive");
    }

    // ── Pose query ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn pose_returns_published_world_pose() {
        let store = Arc::new(LocalPoseStore::new());
        store
            .publish("pdias", pose_at(1.0, 2.0, 0.5), Utc::now())
            .await
            .unwrap();

        let agent = Agent::new("pdias", store);
        let pose = agent.pose().await;
        assert!((pose.position.x - 1.0).abs() < 1e-12);
        assert!((pose.position.y - 2.0).abs() < 1e-12);
        assert!((pose.yaw() - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn pose_degrades_to_identity_before_first_success() {
        let store = Arc::new(UnavailableStore::new());
        let agent = Agent::new("pdias", store.clone()).with_recovery(fast_recovery());

        let pose = agent.pose().await;
        assert_eq!(pose, Pose::identity());
        assert_eq!(store.lookup_count(), 1, "the store must actually be asked");
    }

    #[tokio::test]
    async fn pose_returns_within_bounded_interval_when_degraded() {
        let store = Arc::new(UnavailableStore::new());
        let agent = Agent::new("pdias", store).with_recovery(fast_recovery());

        let start = Instant::now();
        for _ in 0..5 {
            agent.pose().await;
        }
        assert!(
            start.elapsed() < Duration::from_millis(500),
            "five degraded queries must stay bounded"
        );
    }

    #[tokio::test]
    async fn pose_returns_stale_value_during_outage() {
        let inner = Arc::new(LocalPoseStore::new());
        let flaky = Arc::new(FlakyStore::new(inner));
        flaky
            .publish("pdias", pose_at(4.0, -1.0, 0.2), Utc::now())
            .await
            .unwrap();

        let agent = Agent::new("pdias", flaky.clone()).with_recovery(fast_recovery());
        let healthy = agent.pose().await;

        flaky.set_available(false);
        let degraded = agent.pose().await;
        assert_eq!(degraded, healthy, "outage must serve the stale pose");
    }

    // ── Distance ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn distance_between_two_published_agents() {
        let store = Arc::new(LocalPoseStore::new());
        store
            .publish("hunter", pose_at(1.0, 2.0, 0.0), Utc::now())
            .await
            .unwrap();
        store
            .publish("prey", pose_at(4.0, -2.0, 0.0), Utc::now())
            .await
            .unwrap();

        let hunter = Agent::new("hunter", store.clone());
        let prey = Agent::new("prey", store);
        let d = hunter.distance_to(&prey).await;
        assert!((d - 5.0).abs() < 1e-9, "expected 5.0, got {d}");
    }

    #[tokio::test]
    async fn distance_is_symmetric() {
        let store = Arc::new(LocalPoseStore::new());
        store
            .publish("a", pose_at(1.0, 2.0, 0.3), Utc::now())
            .await
            .unwrap();
        store
            .publish("b", pose_at(4.0, -1.0, -0.8), Utc::now())
            .await
            .unwrap();

        let a = Agent::new("a", store.clone());
        let b = Agent::new("b", store);
        let ab = a.distance_to(&b).await;
        let ba = b.distance_to(&a).await;
        assert!((ab - ba).abs() < 1e-9, "ab={ab} ba={ba}");
    }

    #[tokio::test]
    async fn distance_ignores_height() {
        let store = Arc::new(LocalPoseStore::new());
        store
            .publish("a", Pose::identity(), Utc::now())
            .await
            .unwrap();
        store
            .publish(
                "b",
                Pose::new(Vec3::new(3.0, 4.0, 7.0), Quat::identity()),
                Utc::now(),
            )
            .await
            .unwrap();

        let a = Agent::new("a", store);
        let d = a.distance_to_frame("b").await;
        assert!((d - 5.0).abs() < 1e-9, "z must not contribute, got {d}");
    }

    #[tokio::test]
    async fn distance_is_finite_under_persistent_unavailability() {
        let store = Arc::new(UnavailableStore::new());
        let agent = Agent::new("pdias", store).with_recovery(fast_recovery());

        let d = agent.distance_to_frame("ghost").await;
        assert!(d.is_finite());
        assert_eq!(d, 0.0, "no relative pose ever seen; identity fallback");
    }

    #[tokio::test]
    async fn distance_serves_stale_value_during_outage() {
        let inner = Arc::new(LocalPoseStore::new());
        let flaky = Arc::new(FlakyStore::new(inner));
        flaky
            .publish("hunter", Pose::identity(), Utc::now())
            .await
            .unwrap();
        flaky
            .publish("prey", pose_at(3.0, 4.0, 0.0), Utc::now())
            .await
            .unwrap();

        let hunter = Agent::new("hunter", flaky.clone()).with_recovery(fast_recovery());
        let healthy = hunter.distance_to_frame("prey").await;
        assert!((healthy - 5.0).abs() < 1e-9);

        flaky.set_available(false);
        let degraded = hunter.distance_to_frame("prey").await;
        assert!((degraded - 5.0).abs() < 1e-9, "stale distance must be served");
    }
}
