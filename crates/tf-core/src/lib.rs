//! Shared geometry primitives for Twinforge.
//!
//! Both simulation cores speak in terms of [`glam`] vectors. This crate adds
//! the handful of shapes and queries they share: boxes, vertical cylinders,
//! disc push-out, directed sectors, and yaw/pitch orientation.

/// Axis-aligned boxes and vertical cylinders.
pub mod shapes;
/// Overlap tests, push-out resolution, and sector queries.
pub mod collision;
/// Yaw/pitch orientation and turning helpers.
pub mod orientation;
/// Inclusive float ranges sampled with a caller-supplied RNG.
pub mod range;

/// Re-exports of [`shapes::Aabb2`], [`shapes::Aabb3`], [`shapes::Cylinder`], and [`shapes::RayHit`].
pub use shapes::{Aabb2, Aabb3, Cylinder, RayHit};
/// Re-exports of the free collision helpers.
pub use collision::{
    is_point_in_directed_sector, push_disc_out_of_aabb, push_disc_out_of_disc,
};
/// Re-exports of the orientation type and turning helpers.
pub use orientation::{EulerAngles, heading_degrees, turn_toward_degrees};
/// Re-export of [`range::FloatRange`].
pub use range::FloatRange;

/// Re-export of the vector types used throughout Twinforge.
pub use glam::{IVec2, Vec2, Vec3};
