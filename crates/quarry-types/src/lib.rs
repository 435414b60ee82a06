//! `quarry-types` – shared value types for the pursuit simulation.
//!
//! # Modules
//!
//! - [`pose`] – rigid-body pose algebra: [`Vec3`], [`Quat`], [`Pose`]
//!   (compose / inverse / planar distance) and the registry record
//!   [`StampedPose`].
//! - [`team`] – the three recognised [`TeamColor`] labels and their
//!   validated parsing.

use thiserror::Error;

pub mod pose;
pub mod team;

pub use pose::{Pose, Quat, StampedPose, Vec3};
pub use team::TeamColor;

/// The fixed global reference frame all agent poses are ultimately
/// expressed in.
pub const WORLD_FRAME: &str = "/map";

/// Errors spanning registry lookups and team bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuarryError {
    /// The registry cannot yet resolve the requested frame pair.  A
    /// transient condition: publishers may not have propagated yet, or may
    /// never publish at all.  Core operations recover from this locally and
    /// never surface it to their callers.
    #[error("transform unavailable ({source_frame} in {target_frame}): {reason}")]
    TransformUnavailable {
        target_frame: String,
        source_frame: String,
        reason: String,
    },

    /// A team label outside red / green / blue.  Surfaced exactly one level
    /// up as a status result; the prior team assignment stays intact.
    #[error("invalid team label {0:?} (expected red, green or blue)")]
    InvalidTeamLabel(String),
}

impl QuarryError {
    /// Build a [`QuarryError::TransformUnavailable`] for a frame pair.
    pub fn unavailable(
        target_frame: impl Into<String>,
        source_frame: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TransformUnavailable {
            target_frame: target_frame.into(),
            source_frame: source_frame.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_the_frame_pair() {
        let err = QuarryError::unavailable("/map", "pdias", "not published");
        let msg = err.to_string();
        assert!(msg.contains("/map"));
        assert!(msg.contains("pdias"));
        assert!(msg.contains("not published"));
    }

    #[test]
    fn invalid_team_label_display() {
        let err = QuarryError::InvalidTeamLabel("mauve".to_string());
        assert!(err.to_string().contains("mauve"));
    }
}
