use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Yaw and pitch in degrees, Z up.
///
/// Yaw rotates about +Z starting from +X; positive pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EulerAngles {
    /// Rotation about +Z in degrees.
    pub yaw: f32,
    /// Rotation about the left axis in degrees, positive looking down.
    pub pitch: f32,
}

impl EulerAngles {
    /// Build from yaw and pitch in degrees.
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Facing purely along the horizontal plane.
    pub fn from_yaw(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }

    /// Unit forward vector.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vec3::new(cy * cp, sy * cp, -sp)
    }

    /// Unit left vector, always horizontal.
    pub fn left(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(-sy, cy, 0.0)
    }

    /// Unit up vector, perpendicular to forward and left.
    pub fn up(&self) -> Vec3 {
        self.forward().cross(self.left())
    }

    /// Horizontal forward direction.
    pub fn forward_xy(&self) -> Vec2 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec2::new(cy, sy)
    }
}

/// The heading of a 2D direction in degrees.
pub fn heading_degrees(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x).to_degrees()
}

/// Rotate `current` toward `goal` by at most `max_delta` degrees along the
/// shorter arc.
pub fn turn_toward_degrees(current: f32, goal: f32, max_delta: f32) -> f32 {
    let mut diff = (goal - current) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    if diff.abs() <= max_delta {
        current + diff
    } else {
        current + max_delta.copysign(diff)
    }
}
