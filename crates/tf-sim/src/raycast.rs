//! Ray queries against walls, floor, ceiling, and actors.

use glam::{IVec2, Vec3};

use crate::handle::ActorHandle;
use crate::world::World;

/// Outcome of a ray query. A miss is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    /// Whether anything was struck within range.
    pub did_impact: bool,
    /// Distance to the impact, or the full range on a miss.
    pub impact_distance: f32,
    /// Impact point, or the ray's end on a miss.
    pub impact_position: Vec3,
    /// Surface normal at the impact point.
    pub impact_normal: Vec3,
    /// Ray origin.
    pub start: Vec3,
    /// Normalized ray direction.
    pub forward: Vec3,
    /// Requested range.
    pub max_distance: f32,
    /// The actor struck, for actor hits.
    pub hit_actor: Option<ActorHandle>,
}

impl RaycastResult {
    fn miss(start: Vec3, forward: Vec3, max_distance: f32) -> Self {
        Self {
            did_impact: false,
            impact_distance: max_distance,
            impact_position: start + forward * max_distance,
            impact_normal: Vec3::ZERO,
            start,
            forward,
            max_distance,
            hit_actor: None,
        }
    }

    fn hit(start: Vec3, forward: Vec3, max_distance: f32, distance: f32, normal: Vec3) -> Self {
        Self {
            did_impact: true,
            impact_distance: distance,
            impact_position: start + forward * distance,
            impact_normal: normal,
            start,
            forward,
            max_distance,
            hit_actor: None,
        }
    }
}

impl World {
    /// Step through the grid cell by cell until a wall is crossed.
    pub fn raycast_walls(&self, start: Vec3, forward: Vec3, max_distance: f32) -> RaycastResult {
        let map = &self.map;
        let mut tile = map.coords_for(start);

        let inside_wall = map.tile(tile).is_some_and(|t| {
            map.definition_of(t).solid && start.z >= t.bounds.min.z && start.z <= t.bounds.max.z
        });
        if inside_wall {
            return RaycastResult::hit(start, forward, max_distance, 0.0, -forward);
        }

        let step = IVec2::new(
            if forward.x < 0.0 { -1 } else { 1 },
            if forward.y < 0.0 { -1 } else { 1 },
        );
        let dist_per_x = axis_distance_per_unit(forward.x);
        let dist_per_y = axis_distance_per_unit(forward.y);
        let first_x = tile.x as f32 + (step.x + 1) as f32 * 0.5;
        let first_y = tile.y as f32 + (step.y + 1) as f32 * 0.5;
        let mut next_x = (first_x - start.x).abs() * dist_per_x;
        let mut next_y = (first_y - start.y).abs() * dist_per_y;
        let size = map.dimensions();

        loop {
            let (distance, normal) = if next_x < next_y {
                let d = next_x;
                tile.x += step.x;
                next_x += dist_per_x;
                (d, Vec3::new(-step.x as f32, 0.0, 0.0))
            } else {
                let d = next_y;
                tile.y += step.y;
                next_y += dist_per_y;
                (d, Vec3::new(0.0, -step.y as f32, 0.0))
            };

            if distance > max_distance {
                return RaycastResult::miss(start, forward, max_distance);
            }
            let leaving = (tile.x < 0 && step.x < 0)
                || (tile.x >= size.x && step.x > 0)
                || (tile.y < 0 && step.y < 0)
                || (tile.y >= size.y && step.y > 0);
            if leaving {
                return RaycastResult::miss(start, forward, max_distance);
            }

            let position = start + forward * distance;
            let struck = map.tile(tile).is_some_and(|t| {
                map.definition_of(t).solid
                    && position.z >= t.bounds.min.z
                    && position.z <= t.bounds.max.z
            });
            if struck {
                return RaycastResult::hit(start, forward, max_distance, distance, normal);
            }
        }
    }

    /// Intersect the floor plane at z = 0.
    pub fn raycast_floor(&self, start: Vec3, forward: Vec3, max_distance: f32) -> RaycastResult {
        self.raycast_plane(start, forward, max_distance, 0.0, Vec3::Z)
    }

    /// Intersect the ceiling plane.
    pub fn raycast_ceiling(&self, start: Vec3, forward: Vec3, max_distance: f32) -> RaycastResult {
        self.raycast_plane(start, forward, max_distance, self.map.ceiling_height(), Vec3::NEG_Z)
    }

    fn raycast_plane(
        &self,
        start: Vec3,
        forward: Vec3,
        max_distance: f32,
        plane_z: f32,
        normal: Vec3,
    ) -> RaycastResult {
        let travel = forward.z * max_distance;
        if travel.abs() <= f32::EPSILON {
            return RaycastResult::miss(start, forward, max_distance);
        }
        let t = (plane_z - start.z) / travel;
        if !(0.0..=1.0).contains(&t) {
            return RaycastResult::miss(start, forward, max_distance);
        }
        let hit = RaycastResult::hit(start, forward, max_distance, max_distance * t, normal);
        if self.map.is_valid_position(hit.impact_position) {
            hit
        } else {
            RaycastResult::miss(start, forward, max_distance)
        }
    }

    /// The nearest living actor cylinder along the ray, skipping `ignore`.
    pub fn raycast_actors(
        &self,
        start: Vec3,
        forward: Vec3,
        max_distance: f32,
        ignore: Option<ActorHandle>,
    ) -> RaycastResult {
        let mut best = RaycastResult::miss(start, forward, max_distance);
        for actor in self.living_actors() {
            if Some(actor.handle) == ignore {
                continue;
            }
            let Some(hit) = actor.cylinder().raycast(start, forward, max_distance) else {
                continue;
            };
            if !best.did_impact || hit.distance < best.impact_distance {
                best = RaycastResult::hit(start, forward, max_distance, hit.distance, hit.normal);
                best.hit_actor = Some(actor.handle);
            }
        }
        best
    }

    /// The nearest impact among actors, floor, ceiling, and walls.
    pub fn raycast_all(
        &self,
        start: Vec3,
        forward: Vec3,
        max_distance: f32,
        ignore: Option<ActorHandle>,
    ) -> RaycastResult {
        [
            self.raycast_actors(start, forward, max_distance, ignore),
            self.raycast_floor(start, forward, max_distance),
            self.raycast_ceiling(start, forward, max_distance),
            self.raycast_walls(start, forward, max_distance),
        ]
        .into_iter()
        .filter(|r| r.did_impact)
        .min_by(|a, b| a.impact_distance.total_cmp(&b.impact_distance))
        .unwrap_or_else(|| RaycastResult::miss(start, forward, max_distance))
    }
}

fn axis_distance_per_unit(component: f32) -> f32 {
    if component.abs() > f32::EPSILON {
        1.0 / component.abs()
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::definition::{Definitions, SpawnInfo};
    use crate::map::TileMap;

    const LAYOUT: [&str; 5] = ["#####", "#...#", "#...#", "#...#", "#####"];

    fn world() -> World {
        let defs = Arc::new(Definitions::builtin().unwrap());
        let map = TileMap::from_layout("box", &LAYOUT, defs.tiles(), 1.0).unwrap();
        World::with_map(defs, map)
    }

    #[test]
    fn ray_hits_east_wall() {
        let world = world();
        let r = world.raycast_walls(Vec3::new(1.5, 2.5, 0.5), Vec3::X, 10.0);
        assert!(r.did_impact);
        assert!((r.impact_distance - 2.5).abs() < 1e-5);
        assert_eq!(r.impact_normal, Vec3::NEG_X);
        assert!((r.impact_position.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_hits_south_wall_with_positive_normal() {
        let world = world();
        let r = world.raycast_walls(Vec3::new(2.5, 2.5, 0.5), Vec3::NEG_Y, 10.0);
        assert!(r.did_impact);
        assert!((r.impact_distance - 1.5).abs() < 1e-5);
        assert_eq!(r.impact_normal, Vec3::Y);
    }

    #[test]
    fn diagonal_ray_reaches_a_wall() {
        let world = world();
        let dir = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = world.raycast_walls(Vec3::new(1.5, 1.5, 0.5), dir, 10.0);
        assert!(r.did_impact);
        assert!((r.impact_distance - 2.5 * 2f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn wall_ray_out_of_range_misses() {
        let world = world();
        let r = world.raycast_walls(Vec3::new(1.5, 2.5, 0.5), Vec3::X, 2.0);
        assert!(!r.did_impact);
        assert!((r.impact_distance - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ray_starting_in_wall_hits_immediately() {
        let world = world();
        let r = world.raycast_walls(Vec3::new(0.5, 2.5, 0.5), Vec3::X, 10.0);
        assert!(r.did_impact);
        assert!(r.impact_distance.abs() < f32::EPSILON);
        assert_eq!(r.impact_normal, Vec3::NEG_X);
    }

    #[test]
    fn ray_above_walls_passes_over() {
        let world = world();
        let r = world.raycast_walls(Vec3::new(1.5, 2.5, 1.5), Vec3::X, 10.0);
        assert!(!r.did_impact);
    }

    #[test]
    fn floor_and_ceiling() {
        let world = world();
        let down = Vec3::new(1.0, 0.0, -1.0).normalize();
        let r = world.raycast_floor(Vec3::new(1.5, 2.5, 0.5), down, 10.0);
        assert!(r.did_impact);
        assert_eq!(r.impact_normal, Vec3::Z);
        assert!(r.impact_position.z.abs() < 1e-5);
        assert!((r.impact_distance - 0.5 * 2f32.sqrt()).abs() < 1e-5);

        let up = Vec3::new(0.0, 1.0, 1.0).normalize();
        let r = world.raycast_ceiling(Vec3::new(2.5, 1.5, 0.5), up, 10.0);
        assert!(r.did_impact);
        assert_eq!(r.impact_normal, Vec3::NEG_Z);
        assert!((r.impact_position.z - 1.0).abs() < 1e-5);

        let r = world.raycast_floor(Vec3::new(1.5, 2.5, 0.5), Vec3::X, 10.0);
        assert!(!r.did_impact);
        let r = world.raycast_floor(Vec3::new(1.5, 2.5, 0.5), down, 0.5);
        assert!(!r.did_impact);
    }

    #[test]
    fn floor_impact_outside_map_misses() {
        let world = world();
        let dir = Vec3::new(-1.0, 0.0, -0.01).normalize();
        let r = world.raycast_floor(Vec3::new(1.5, 2.5, 0.5), dir, 100.0);
        assert!(!r.did_impact);
    }

    #[test]
    fn actor_ray_reports_struck_actor_and_skips_ignored() {
        let mut world = world();
        let shooter = world
            .spawn_actor(&SpawnInfo::new("Marine", Vec3::new(1.5, 2.5, 0.0)), 0.0)
            .unwrap();
        let demon = world
            .spawn_actor(&SpawnInfo::new("Demon", Vec3::new(3.0, 2.5, 0.0)), 0.0)
            .unwrap();
        let eye = world.resolve(shooter).unwrap().eye_position();
        let r = world.raycast_actors(eye, Vec3::X, 10.0, Some(shooter));
        assert!(r.did_impact);
        assert_eq!(r.hit_actor, Some(demon));
        assert!((r.impact_distance - (1.5 - 0.35)).abs() < 1e-4);

        let r = world.raycast_actors(eye, Vec3::X, 10.0, None);
        assert_eq!(r.hit_actor, Some(shooter));
    }

    #[test]
    fn raycast_all_picks_nearest() {
        let mut world = world();
        world
            .spawn_actor(&SpawnInfo::new("Demon", Vec3::new(3.0, 2.5, 0.0)), 0.0)
            .unwrap();
        let r = world.raycast_all(Vec3::new(1.5, 2.5, 0.5), Vec3::X, 10.0, None);
        assert!(r.hit_actor.is_some());

        let r = world.raycast_all(Vec3::new(1.5, 2.5, 0.5), Vec3::NEG_X, 10.0, None);
        assert!(r.did_impact && r.hit_actor.is_none());
        assert!((r.impact_distance - 0.5).abs() < 1e-5);

        let r = world.raycast_all(Vec3::new(1.5, 2.5, 0.5), Vec3::X, 0.1, None);
        assert!(!r.did_impact);
    }

    #[test]
    fn repeated_casts_are_identical() {
        let world = world();
        let dir = Vec3::new(0.3, -0.8, 0.1).normalize();
        let a = world.raycast_all(Vec3::new(2.2, 2.7, 0.4), dir, 8.0, None);
        let b = world.raycast_all(Vec3::new(2.2, 2.7, 0.4), dir, 8.0, None);
        assert_eq!(a, b);
    }
}
