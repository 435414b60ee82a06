//! `quarry-agents` – agents, bounded motion, and team bookkeeping.
//!
//! # Modules
//!
//! - [`agent`] – [`Agent`]: a named pose in the world frame with best-effort
//!   pose and planar-distance queries through an injected
//!   [`PoseStore`][quarry_registry::PoseStore].
//! - [`motion`] – [`ControlledAgent`]: an [`Agent`] composed with the motion
//!   capability (sole writer of its own frame) plus the clamped
//!   [`MotionCommand`].
//! - [`roster`] – [`Roster`]: ordered, append-only team membership with
//!   by-name lookup.
//! - [`recovery`] – [`BestEffort`]: the log + pause + degrade policy applied
//!   at every registry boundary.

pub mod agent;
pub mod motion;
pub mod recovery;
pub mod roster;

pub use agent::Agent;
pub use motion::{ControlledAgent, MAX_DISPLACEMENT, MAX_TURN, MIN_DISPLACEMENT, MotionCommand};
pub use recovery::{BestEffort, DEFAULT_RECOVERY_PAUSE};
pub use roster::Roster;
