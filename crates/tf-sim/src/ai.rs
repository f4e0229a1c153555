//! Target acquisition and pursuit for computer-driven actors.

use glam::Vec3;
use tf_core::{heading_degrees, is_point_in_directed_sector};
use tracing::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::handle::ActorHandle;
use crate::weapon;
use crate::world::World;

/// Per-actor AI memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiController {
    /// Current target. Goes stale on its own when the target is destroyed.
    pub target: ActorHandle,
}

impl AiController {
    /// Retaliate: whoever did the damage becomes the target, unconditionally.
    pub fn damaged_by(&mut self, attacker: ActorHandle) {
        self.target = attacker;
    }
}

/// The nearest hostile actor the viewer can see.
///
/// Candidates are living, hostile, non-projectile actors whose cylinder's
/// nearest point to the viewer's eye lies inside the sight sector. The
/// closest candidate that an unobstructed ray actually reaches wins.
pub fn closest_visible_enemy(world: &World, viewer: ActorHandle) -> Option<ActorHandle> {
    let me = world.resolve(viewer)?;
    let eye = me.eye_position();
    let forward = me.forward_xy();
    let sight = &me.definition;

    let mut candidates: Vec<(f32, ActorHandle)> = world
        .living_actors()
        .filter(|other| other.handle != viewer)
        .filter(|other| !other.is_projectile() && other.definition.radius > 0.0)
        .filter(|other| me.faction.is_hostile_to(other.faction))
        .filter_map(|other| {
            let nearest = other.cylinder().nearest_point(eye);
            is_point_in_directed_sector(
                nearest.truncate(),
                eye.truncate(),
                forward,
                sight.sight_angle,
                sight.sight_radius,
            )
            .then(|| (nearest.distance_squared(eye), other.handle))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    candidates
        .into_iter()
        .find(|&(_, handle)| has_line_of_sight(world, viewer, eye, handle))
        .map(|(_, handle)| handle)
}

fn has_line_of_sight(world: &World, viewer: ActorHandle, eye: Vec3, target: ActorHandle) -> bool {
    let Some(other) = world.resolve(target) else {
        return false;
    };
    let bottom = other.position.z;
    let aim = Vec3::new(
        other.position.x,
        other.position.y,
        eye.z.clamp(bottom, bottom + other.definition.height),
    );
    let distance = eye.distance(aim);
    if distance <= f32::EPSILON {
        return true;
    }
    let hit = world.raycast_all(eye, (aim - eye) / distance, distance, Some(viewer));
    hit.hit_actor == Some(target)
}

/// One frame of thinking for an AI-driven actor.
///
/// Keeps a living target or looks for a new one, turns toward it at the
/// actor's turn rate, then either closes the distance or attacks.
pub fn update_ai(ctx: &mut SimContext<'_>, handle: ActorHandle) -> SimResult<()> {
    let Some(ai) = ctx.world.resolve(handle).and_then(|a| a.ai) else {
        return Ok(());
    };

    let mut target = ai.target;
    let target_alive = ctx.world.resolve(target).is_some_and(|t| t.is_alive());
    if !target_alive {
        target = closest_visible_enemy(ctx.world, handle).unwrap_or(ActorHandle::INVALID);
        if let Some(ai) = ctx.world.resolve_mut(handle).and_then(|a| a.ai.as_mut()) {
            ai.target = target;
        }
        if target.is_valid() {
            debug!(actor = %handle, %target, "target acquired");
            ctx.emit(
                SimEventKind::TargetAcquired {
                    actor: handle,
                    target,
                },
                format!("{handle} targets {target}"),
            );
        }
    }

    let Some((goal, goal_radius)) = ctx
        .world
        .resolve(target)
        .map(|t| (t.position, t.definition.radius))
    else {
        return Ok(());
    };

    let dt = ctx.frame_seconds();
    let tolerance = ctx.config.attack_tolerance;
    let Some(actor) = ctx.world.resolve_mut(handle) else {
        return Ok(());
    };
    let to_goal = (goal - actor.position).truncate();
    if to_goal.length_squared() > f32::EPSILON {
        let max_turn = actor.definition.turn_speed * dt;
        actor.turn_toward(heading_degrees(to_goal), max_turn);
    }

    let reach = actor.definition.radius + goal_radius + tolerance;
    if to_goal.length() > reach {
        let velocity = actor.forward_xy() * actor.definition.run_speed;
        actor.move_in_direction(velocity);
        Ok(())
    } else {
        weapon::fire(ctx, handle).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::definition::{Definitions, SpawnInfo};
    use crate::map::TileMap;

    fn open_world(layout: &[&str]) -> World {
        let defs = Arc::new(Definitions::builtin().unwrap());
        let map = TileMap::from_layout("test", layout, defs.tiles(), 1.0).unwrap();
        World::with_map(defs, map)
    }

    const OPEN: [&str; 6] = [
        "##########",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "##########",
    ];

    fn spawn(world: &mut World, name: &str, x: f32, y: f32, yaw: f32) -> ActorHandle {
        world
            .spawn_actor(&SpawnInfo::new(name, Vec3::new(x, y, 0.0)).with_yaw(yaw), 0.0)
            .unwrap()
    }

    #[test]
    fn sees_enemy_in_front() {
        let mut world = open_world(&OPEN);
        let demon = spawn(&mut world, "Demon", 1.5, 2.5, 0.0);
        let marine = spawn(&mut world, "Marine", 5.5, 2.5, 180.0);
        assert_eq!(closest_visible_enemy(&world, demon), Some(marine));
        assert_eq!(closest_visible_enemy(&world, marine), Some(demon));
    }

    #[test]
    fn ignores_enemy_behind() {
        let mut world = open_world(&OPEN);
        let demon = spawn(&mut world, "Demon", 5.5, 2.5, 0.0);
        spawn(&mut world, "Marine", 2.5, 2.5, 0.0);
        assert_eq!(closest_visible_enemy(&world, demon), None);
    }

    #[test]
    fn ignores_friends() {
        let mut world = open_world(&OPEN);
        let demon = spawn(&mut world, "Demon", 1.5, 2.5, 0.0);
        spawn(&mut world, "Demon", 4.5, 2.5, 0.0);
        assert_eq!(closest_visible_enemy(&world, demon), None);
    }

    #[test]
    fn picks_the_nearest_enemy() {
        let mut world = open_world(&OPEN);
        let demon = spawn(&mut world, "Demon", 1.5, 2.5, 0.0);
        spawn(&mut world, "Marine", 7.5, 2.5, 0.0);
        let near = spawn(&mut world, "Marine", 4.5, 2.7, 0.0);
        assert_eq!(closest_visible_enemy(&world, demon), Some(near));
    }

    #[test]
    fn walls_block_sight() {
        let layout = [
            "##########",
            "#........#",
            "#...#....#",
            "#...#....#",
            "#........#",
            "##########",
        ];
        let mut world = open_world(&layout);
        // Row index 3 from the top is y = 2.
        let demon = spawn(&mut world, "Demon", 1.5, 2.5, 0.0);
        spawn(&mut world, "Marine", 7.5, 2.5, 0.0);
        assert_eq!(closest_visible_enemy(&world, demon), None);
    }

    #[test]
    fn damage_forces_retarget() {
        let mut ai = AiController::default();
        assert!(!ai.target.is_valid());
        let attacker = ActorHandle::new(3, 7);
        ai.damaged_by(attacker);
        assert_eq!(ai.target, attacker);
    }
}
