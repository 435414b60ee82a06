//! `quarry-registry` – the transform registry seam.
//!
//! Agents publish their pose into, and resolve relative poses out of, a
//! shared registry keyed by frame name.  This crate defines the seam and the
//! in-process implementations:
//!
//! # Modules
//!
//! - [`store`] – [`PoseStore`]: the async publish/lookup capability trait
//!   agents hold as an injected `Arc<dyn PoseStore>`.
//! - [`local`] – [`LocalPoseStore`][local::LocalPoseStore]: shared
//!   in-process store with an optional propagation delay that reproduces
//!   read-after-write visibility lag.
//! - [`sim`] – [`UnavailableStore`][sim::UnavailableStore] and
//!   [`FlakyStore`][sim::FlakyStore]: deliberately degraded stores for
//!   exercising the best-effort recovery path in tests.

pub mod local;
pub mod sim;
pub mod store;

pub use local::LocalPoseStore;
pub use sim::{FlakyStore, UnavailableStore};
pub use store::PoseStore;
