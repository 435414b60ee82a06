//! Bounded motion integration.
//!
//! [`ControlledAgent`] is an [`Agent`] plus the motion capability: it is the
//! sole writer of its own frame in the registry, and the only way its pose
//! advances is [`ControlledAgent::step`].  Composition replaces the usual
//! is-a hierarchy – entities that cannot move simply hold a plain [`Agent`].
//!
//! Every step is clamped before it is applied: displacement into
//! [`MIN_DISPLACEMENT`]..=[`MAX_DISPLACEMENT`], turn angle into ±[`MAX_TURN`].
//!
//! # Example
//!
//! ```rust
//! use quarry_agents::{MAX_TURN, MotionCommand};
//!
//! // Way out of bounds on both axes.
//! let cmd = MotionCommand::new(5.0, 10.0).clamped();
//! assert!((cmd.displacement - 1.0).abs() < 1e-12);
//! assert!((cmd.turn - MAX_TURN).abs() < 1e-12);
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

use chrono::Utc;
use quarry_registry::PoseStore;
use quarry_types::{Pose, Quat, QuarryError, Vec3};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::recovery::BestEffort;

/// Largest forward step per tick.
pub const MAX_DISPLACEMENT: f64 = 1.0;
/// Largest backward step per tick.
pub const MIN_DISPLACEMENT: f64 = -0.1;
/// Largest yaw change per tick, either direction.
pub const MAX_TURN: f64 = PI / 60.0;

// ────────────────────────────────────────────────────────────────────────────
// MotionCommand
// ────────────────────────────────────────────────────────────────────────────

/// A requested step: linear displacement along the local forward axis plus a
/// yaw change.  Both fields accept arbitrary doubles; [`clamped`] produces
/// the command that will actually be applied.
///
/// [`clamped`]: MotionCommand::clamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub displacement: f64,
    pub turn: f64,
}

impl MotionCommand {
    pub fn new(displacement: f64, turn: f64) -> Self {
        Self { displacement, turn }
    }

    /// Clamp both axes into their authorized bounds.  Non-finite inputs
    /// collapse to zero motion so a bad command can never poison the pose.
    pub fn clamped(self) -> Self {
        let displacement = if self.displacement.is_finite() {
            self.displacement.clamp(MIN_DISPLACEMENT, MAX_DISPLACEMENT)
        } else {
            0.0
        };
        let turn = if self.turn.is_finite() {
            self.turn.clamp(-MAX_TURN, MAX_TURN)
        } else {
            0.0
        };
        Self { displacement, turn }
    }

    /// The local-frame delta pose this command produces: translation along
    /// local +X, yaw-only rotation.
    pub fn delta_pose(self) -> Pose {
        Pose::new(
            Vec3::new(self.displacement, 0.0, 0.0),
            Quat::from_yaw(self.turn),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ControlledAgent
// ────────────────────────────────────────────────────────────────────────────

/// An agent that owns the authority to write its own frame.
///
/// Spawning publishes the identity pose immediately, so the frame resolves
/// (once propagated) before the first step.  All registry failures along the
/// step path are logged and swallowed: motion is best-effort, never an
/// error surface.
pub struct ControlledAgent {
    agent: Agent,
}

impl ControlledAgent {
    /// Create the agent and publish its spawn pose (identity) right away.
    pub async fn spawn(frame: impl Into<String>, store: Arc<dyn PoseStore>) -> Self {
        let spawned = Self {
            agent: Agent::new(frame, store),
        };
        spawned.publish(Pose::identity()).await;
        spawned
    }

    /// Replace the recovery policy (builder style).
    pub fn with_recovery(mut self, recovery: BestEffort) -> Self {
        self.agent = self.agent.with_recovery(recovery);
        self
    }

    /// The pose-query half of this agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn frame(&self) -> &str {
        self.agent.frame()
    }

    /// See [`Agent::set_team`].
    pub fn set_team(&mut self, label: &str) -> Result<(), QuarryError> {
        self.agent.set_team(label)
    }

    /// See [`Agent::pose`].
    pub async fn pose(&self) -> Pose {
        self.agent.pose().await
    }

    /// Advance the pose by one bounded step.
    ///
    /// The clamped delta is applied in the agent's own local frame, then the
    /// result is expressed in world coordinates and republished.  The
    /// current pose is fetched with the usual best-effort semantics, so a
    /// degraded fetch integrates the step onto a stale base rather than
    /// failing.
    pub async fn step(&self, displacement: f64, turn: f64) {
        let command = MotionCommand::new(displacement, turn).clamped();
        let current = self.agent.pose().await;
        let next = current.compose(command.delta_pose());
        debug!(
            frame = %self.agent.frame(),
            displacement = command.displacement,
            turn = command.turn,
            "advancing pose"
        );
        self.publish(next).await;
    }

    /// Fire-and-forget publish of this agent's frame.
    async fn publish(&self, pose: Pose) {
        if let Err(err) = self
            .agent
            .store()
            .publish(self.agent.frame(), pose, Utc::now())
            .await
        {
            warn!(frame = %self.agent.frame(), error = %err, "pose publish dropped");
        }
    }
}
