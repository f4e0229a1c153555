//! Fixed-rate integration and collision resolution.

use tf_core::{Cylinder, push_disc_out_of_aabb, push_disc_out_of_disc};
use tracing::trace;

use crate::clock::FixedTimestep;
use crate::combat;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::handle::ActorHandle;
use crate::system::System;

/// Runs physics at a fixed rate however frames are sliced.
#[derive(Debug)]
pub struct PhysicsSystem {
    timestep: FixedTimestep,
    steps_run: u64,
}

impl PhysicsSystem {
    /// Physics stepping `hz` times per simulated second.
    pub fn new(hz: u32) -> Self {
        Self {
            timestep: FixedTimestep::new(hz),
            steps_run: 0,
        }
    }

    /// Physics steps executed so far.
    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "physics"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let due = self.timestep.advance(ctx.clock.delta());
        let dt = self.timestep.step_seconds() as f32;
        for _ in 0..due {
            step(ctx, dt);
            self.steps_run += 1;
        }
        trace!(steps = due, total = self.steps_run, "physics stepped");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// One physics step: integrate everyone, then resolve collisions in
/// slot order.
pub fn step(ctx: &mut SimContext<'_>, dt: f32) {
    let gravity = ctx.config.gravity;
    for actor in ctx.world.actors.iter_mut() {
        if actor.definition.simulated {
            actor.integrate(dt, gravity);
        }
    }

    let handles = ctx.world.actors.handles();
    for &handle in &handles {
        let active = ctx
            .world
            .resolve(handle)
            .is_some_and(|a| a.is_alive() && a.definition.simulated);
        if !active {
            continue;
        }
        for &other in &handles {
            if other != handle {
                collide_actors(ctx, handle, other);
            }
        }
        collide_with_map(ctx, handle);
    }
}

/// Push `mover` out of `other` if their cylinders overlap.
fn collide_actors(ctx: &mut SimContext<'_>, mover: ActorHandle, other: ActorHandle) {
    let (Some(a), Some(b)) = (ctx.world.resolve(mover), ctx.world.resolve(other)) else {
        return;
    };
    let exempt = !a.is_alive()
        || !b.is_alive()
        || !b.definition.simulated
        || !a.definition.collides_with_actors
        || !b.definition.collides_with_actors
        || a.owner == Some(other)
        || b.owner == Some(mover)
        || (a.is_projectile() && b.is_projectile());
    if exempt || !a.cylinder().overlaps(&b.cylinder()) {
        return;
    }

    let mut center = a.position.truncate();
    let (mover_radius, fixed_center, fixed_radius) =
        (a.definition.radius, b.position.truncate(), b.definition.radius);
    push_disc_out_of_disc(&mut center, mover_radius, fixed_center, fixed_radius);
    if let Some(actor) = ctx.world.resolve_mut(mover) {
        actor.position.x = center.x;
        actor.position.y = center.y;
    }
    combat::on_collide(ctx, mover, Some(other));
}

/// Keep an actor out of walls and between floor and ceiling.
fn collide_with_map(ctx: &mut SimContext<'_>, handle: ActorHandle) {
    let Some(actor) = ctx.world.resolve(handle) else {
        return;
    };
    if !actor.definition.collides_with_walls {
        return;
    }
    let radius = actor.definition.radius;
    let height = actor.definition.height;
    let mut center = actor.position.truncate();
    let mut hit_wall = false;

    let coords = ctx.world.map.coords_for(actor.position);
    let walls: Vec<_> = ctx
        .world
        .map
        .surrounding(coords)
        .filter(|tile| ctx.world.map.definition_of(tile).solid)
        .map(|tile| tile.bounds)
        .collect();
    for bounds in walls {
        let body = Cylinder::new(center.extend(actor.position.z), radius, height);
        if body.overlaps_aabb(&bounds) {
            hit_wall |= push_disc_out_of_aabb(&mut center, radius, &bounds.xy());
        }
    }

    let ceiling = ctx.world.map.ceiling_height();
    let Some(actor) = ctx.world.resolve_mut(handle) else {
        return;
    };
    actor.position.x = center.x;
    actor.position.y = center.y;

    let mut hit_plane = false;
    if actor.position.z < 0.0 {
        actor.position.z = 0.0;
        actor.velocity.z = 0.0;
        actor.grounded = true;
        hit_plane = true;
    } else if actor.position.z > 0.0 {
        actor.grounded = false;
    } else {
        actor.velocity.z = actor.velocity.z.max(0.0);
        actor.grounded = true;
    }
    if actor.position.z + height > ceiling {
        actor.position.z = (ceiling - height).max(0.0);
        actor.velocity.z = actor.velocity.z.min(0.0);
        hit_plane = true;
    }

    if hit_wall || hit_plane {
        combat::on_collide(ctx, handle, None);
    }
}
