//! Rigid-body pose algebra for the shared world frame.
//!
//! A [`Pose`] is a 3-D rigid-body transform (translation + unit-quaternion
//! rotation) relating one named frame to another.  Agent poses are expressed
//! relative to the fixed world frame `"/map"`; composing and inverting poses
//! is how a relative pose between two agents is extracted from their world
//! poses.
//!
//! The motion model is planar: agents translate along their local forward
//! (+X) axis and rotate about the vertical (Z) axis, so [`Quat::from_yaw`]
//! and [`Quat::yaw`] cover the rotations that actually occur.  The full 3-D
//! algebra is kept so that composed transforms stay exact.
//!
//! # Example
//!
//! ```rust
//! use quarry_types::{Pose, Quat, Vec3};
//!
//! // One metre forward, then a quarter turn left, then one metre forward
//! // again lands at (1, 1, 0).
//! let step = Pose::new(Vec3::new(1.0, 0.0, 0.0), Quat::identity());
//! let turn = Pose::new(Vec3::zero(), Quat::from_yaw(std::f64::consts::FRAC_PI_2));
//!
//! let pose = Pose::identity().compose(step).compose(turn).compose(step);
//! assert!((pose.position.x - 1.0).abs() < 1e-12);
//! assert!((pose.position.y - 1.0).abs() < 1e-12);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Primitive types
// ────────────────────────────────────────────────────────────────────────────

/// A 3-D translation vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    pub fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Euclidean norm of the horizontal (x, y) components, ignoring z.
    pub fn planar_norm(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// A unit quaternion representing a 3-D rotation (w, x, y, z convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    /// Create a quaternion.  The caller is responsible for providing a unit
    /// quaternion; [`Pose::new`] normalizes on entry.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation (no rotation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// A pure rotation about the vertical (Z) axis by `yaw` radians.
    pub fn from_yaw(yaw: f64) -> Self {
        let half = yaw * 0.5;
        Self::new(half.cos(), 0.0, 0.0, half.sin())
    }

    /// Hamilton product: compose two rotations.
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // Express v as a pure quaternion.
        let p = Self::new(0.0, v.x, v.y, v.z);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Rescale to unit length.  Degenerate (zero or non-finite) quaternions
    /// collapse to the identity rather than poisoning downstream math.
    pub fn normalized(self) -> Self {
        let norm =
            (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if !norm.is_finite() || norm < f64::EPSILON {
            return Self::identity();
        }
        Self::new(self.w / norm, self.x / norm, self.y / norm, self.z / norm)
    }

    /// Extract the rotation about the vertical (Z) axis in radians.
    pub fn yaw(self) -> f64 {
        let siny = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        siny.atan2(cosy)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pose
// ────────────────────────────────────────────────────────────────────────────

/// A rigid-body transform: the pose of frame B relative to frame A.
///
/// To convert a point expressed in frame B into frame A, rotate it by
/// `orientation` then add `position`.  The orientation is kept normalized at
/// all times; [`Pose::compose`] renormalizes after every product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    /// Create a pose from a translation and rotation.  The rotation is
    /// normalized on entry.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalized(),
        }
    }

    /// The identity pose: position (0, 0, 0), zero rotation.  The canonical
    /// just-spawned state of an agent.
    pub fn identity() -> Self {
        Self::new(Vec3::zero(), Quat::identity())
    }

    /// Compose two poses: `other` expressed in `self`'s frame.
    ///
    /// If `self` = T_A_B and `other` = T_B_C, the result is T_A_C.
    /// Associative, not commutative.
    pub fn compose(self, other: Self) -> Self {
        let position = self.position.add(self.orientation.rotate(other.position));
        let orientation = self.orientation.mul(other.orientation).normalized();
        Self {
            position,
            orientation,
        }
    }

    /// Exact inverse: `self.compose(self.inverse())` is the identity.
    pub fn inverse(self) -> Self {
        let inv_rot = self.orientation.conjugate();
        Self {
            position: inv_rot.rotate(self.position.neg()),
            orientation: inv_rot,
        }
    }

    /// Euclidean norm of the (x, y) translation, ignoring z and orientation.
    /// This is the inter-agent distance metric.
    pub fn planar_distance(self) -> f64 {
        self.position.planar_norm()
    }

    /// Rotation of this pose about the vertical axis in radians.
    pub fn yaw(self) -> f64 {
        self.orientation.yaw()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StampedPose
// ────────────────────────────────────────────────────────────────────────────

/// A pose tagged with its publication time.  The registry stores exactly one
/// of these per frame name: the latest value, no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampedPose {
    pub pose: Pose,
    pub stamp: DateTime<Utc>,
}

impl StampedPose {
    pub fn new(pose: Pose, stamp: DateTime<Utc>) -> Self {
        Self { pose, stamp }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
