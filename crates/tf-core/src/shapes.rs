use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    /// Minimum corner.
    pub min: Vec2,
    /// Maximum corner.
    pub max: Vec2,
}

impl Aabb2 {
    /// Create a box from its corners.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// The closest point on or inside the box.
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// A 3D axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// Create a box from its corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Whether the point lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// The footprint of this box on the XY plane.
    pub fn xy(&self) -> Aabb2 {
        Aabb2::new(self.min.truncate(), self.max.truncate())
    }
}

/// A vertical cylinder standing on `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Center of the bottom cap.
    pub base: Vec3,
    /// Disc radius.
    pub radius: f32,
    /// Height above the base.
    pub height: f32,
}

/// Where a ray struck a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance travelled along the ray.
    pub distance: f32,
    /// World-space impact point.
    pub position: Vec3,
    /// Outward surface normal at the impact point.
    pub normal: Vec3,
}

impl Cylinder {
    /// Create a cylinder from its base center and dimensions.
    pub fn new(base: Vec3, radius: f32, height: f32) -> Self {
        Self {
            base,
            radius,
            height,
        }
    }

    /// Height of the base disc.
    pub fn bottom(&self) -> f32 {
        self.base.z
    }

    /// Height of the top disc.
    pub fn top(&self) -> f32 {
        self.base.z + self.height
    }

    /// Whether the point lies inside or on the surface.
    pub fn contains(&self, point: Vec3) -> bool {
        point.z >= self.bottom()
            && point.z <= self.top()
            && point.truncate().distance_squared(self.base.truncate()) <= self.radius * self.radius
    }

    /// The closest point on or inside the cylinder.
    pub fn nearest_point(&self, point: Vec3) -> Vec3 {
        let center = self.base.truncate();
        let offset = point.truncate() - center;
        let xy = if offset.length_squared() > self.radius * self.radius {
            center + offset.normalize_or_zero() * self.radius
        } else {
            point.truncate()
        };
        xy.extend(point.z.clamp(self.bottom(), self.top()))
    }

    /// Cylinders overlap when both their discs and their height spans overlap.
    pub fn overlaps(&self, other: &Cylinder) -> bool {
        let reach = self.radius + other.radius;
        let discs = self.base.truncate().distance_squared(other.base.truncate()) < reach * reach;
        discs && self.bottom() < other.top() && other.bottom() < self.top()
    }

    /// Whether this cylinder intersects a box.
    pub fn overlaps_aabb(&self, aabb: &Aabb3) -> bool {
        let center = self.base.truncate();
        let nearest = aabb.xy().nearest_point(center);
        let disc = nearest.distance_squared(center) < self.radius * self.radius;
        disc && self.bottom() < aabb.max.z && aabb.min.z < self.top()
    }

    /// Cast a ray against the cylinder's side and caps.
    ///
    /// `forward` must be normalized. A ray starting inside reports an
    /// impact at distance zero facing back along the ray.
    pub fn raycast(&self, start: Vec3, forward: Vec3, max_distance: f32) -> Option<RayHit> {
        if self.radius <= 0.0 {
            return None;
        }
        if self.contains(start) {
            return Some(RayHit {
                distance: 0.0,
                position: start,
                normal: -forward,
            });
        }

        let mut best: Option<RayHit> = None;
        let mut consider = |hit: RayHit| {
            if hit.distance <= max_distance && best.is_none_or(|b| hit.distance < b.distance) {
                best = Some(hit);
            }
        };

        let center = self.base.truncate();
        let rel = start.truncate() - center;
        let dir = forward.truncate();
        let a = dir.length_squared();
        if a > f32::EPSILON {
            let b = 2.0 * rel.dot(dir);
            let c = rel.length_squared() - self.radius * self.radius;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant >= 0.0 {
                let t = (-b - discriminant.sqrt()) / (2.0 * a);
                if t >= 0.0 {
                    let position = start + forward * t;
                    if position.z >= self.bottom() && position.z <= self.top() {
                        let normal = (position.truncate() - center).normalize_or_zero().extend(0.0);
                        consider(RayHit {
                            distance: t,
                            position,
                            normal,
                        });
                    }
                }
            }
        }

        if forward.z.abs() > f32::EPSILON {
            let (plane, normal) = if forward.z > 0.0 {
                (self.bottom(), Vec3::NEG_Z)
            } else {
                (self.top(), Vec3::Z)
            };
            let t = (plane - start.z) / forward.z;
            if t >= 0.0 {
                let position = start + forward * t;
                if position.truncate().distance_squared(center) <= self.radius * self.radius {
                    consider(RayHit {
                        distance: t,
                        position,
                        normal,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cylinder() -> Cylinder {
        Cylinder::new(Vec3::new(5.0, 5.0, 0.0), 0.5, 1.0)
    }

    #[test]
    fn aabb2_nearest_point_clamps() {
        let b = Aabb2::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(b.nearest_point(Vec2::new(2.0, 0.5)), Vec2::new(1.0, 0.5));
        assert_eq!(b.nearest_point(Vec2::new(0.25, 0.75)), Vec2::new(0.25, 0.75));
        assert!(b.contains(Vec2::new(1.0, 1.0)));
        assert_eq!(b.center(), Vec2::splat(0.5));
    }

    #[test]
    fn aabb3_contains_and_footprint() {
        let b = Aabb3::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 2.0));
        assert!(b.contains(Vec3::new(0.5, 0.5, 1.5)));
        assert!(!b.contains(Vec3::new(0.5, 0.5, 2.5)));
        assert_eq!(b.xy().max, Vec2::ONE);
    }

    #[test]
    fn cylinder_nearest_point_projects_onto_disc_and_span() {
        let c = unit_cylinder();
        let p = c.nearest_point(Vec3::new(7.0, 5.0, 3.0));
        assert!((p.x - 5.5).abs() < 1e-5);
        assert!((p.y - 5.0).abs() < 1e-5);
        assert!((p.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cylinders_overlap_requires_height_overlap() {
        let a = unit_cylinder();
        let b = Cylinder::new(Vec3::new(5.6, 5.0, 0.0), 0.5, 1.0);
        let above = Cylinder::new(Vec3::new(5.6, 5.0, 2.0), 0.5, 1.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&above));
    }

    #[test]
    fn cylinder_overlaps_box() {
        let c = Cylinder::new(Vec3::new(0.8, 0.5, 0.0), 0.3, 0.75);
        let wall = Aabb3::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(c.overlaps_aabb(&wall));
        let far = Cylinder::new(Vec3::new(0.2, 0.5, 0.0), 0.3, 0.75);
        assert!(!far.overlaps_aabb(&wall));
    }

    #[test]
    fn ray_hits_cylinder_side() {
        let c = unit_cylinder();
        let hit = c
            .raycast(Vec3::new(0.0, 5.0, 0.5), Vec3::X, 10.0)
            .expect("should hit");
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn ray_hits_cylinder_top_cap() {
        let c = unit_cylinder();
        let hit = c
            .raycast(Vec3::new(5.0, 5.0, 3.0), Vec3::NEG_Z, 10.0)
            .expect("should hit");
        assert!((hit.distance - 2.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn ray_misses_out_of_range_or_over_the_top() {
        let c = unit_cylinder();
        assert!(c.raycast(Vec3::new(0.0, 5.0, 0.5), Vec3::X, 4.0).is_none());
        assert!(c.raycast(Vec3::new(0.0, 5.0, 1.5), Vec3::X, 10.0).is_none());
        assert!(c.raycast(Vec3::new(0.0, 5.0, 0.5), Vec3::NEG_X, 10.0).is_none());
    }

    #[test]
    fn ray_starting_inside_hits_immediately() {
        let c = unit_cylinder();
        let hit = c
            .raycast(Vec3::new(5.0, 5.0, 0.5), Vec3::Y, 10.0)
            .expect("inside");
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vec3::NEG_Y);
    }
}
