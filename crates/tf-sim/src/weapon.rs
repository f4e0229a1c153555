//! Weapons and their three fire modes.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng;
use tf_core::{EulerAngles, is_point_in_directed_sector};
use tracing::debug;

use crate::actor::ActorState;
use crate::clock::Stopwatch;
use crate::combat;
use crate::context::SimContext;
use crate::definition::{SpawnInfo, WeaponDefinition};
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::handle::ActorHandle;

/// How far below the eye hit-scan rays start.
const RAY_DROP: f32 = 0.03;
/// How far below the eye projectiles appear.
const PROJECTILE_DROP: f32 = 0.09;

/// A weapon in an actor's inventory.
#[derive(Debug, Clone)]
pub struct Weapon {
    /// Static parameters.
    pub definition: Arc<WeaponDefinition>,
    refire: Stopwatch,
}

impl Weapon {
    /// A weapon ready to fire.
    pub fn new(definition: Arc<WeaponDefinition>) -> Self {
        let refire = Stopwatch::new(f64::from(definition.refire_time));
        Self { definition, refire }
    }

    /// Definition name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Whether the refire delay has passed.
    pub fn ready(&self, now: f64) -> bool {
        self.refire.is_stopped() || self.refire.has_period_elapsed(now)
    }

    /// Restart the refire timer at `now`.
    pub fn mark_fired(&mut self, now: f64) {
        self.refire.start(now);
    }
}

/// Fire the shooter's equipped weapon if it is ready.
///
/// Returns whether a shot was taken. Every mode with a non-zero count
/// fires: hit-scan rays, then projectiles, then melee swings.
pub fn fire(ctx: &mut SimContext<'_>, shooter: ActorHandle) -> SimResult<bool> {
    let now = ctx.now();
    let Some(actor) = ctx.world.resolve_mut(shooter) else {
        return Ok(false);
    };
    if !actor.is_alive() {
        return Ok(false);
    }
    let equipped = actor.equipped;
    let Some(weapon) = actor.weapons.get_mut(equipped) else {
        return Ok(false);
    };
    if !weapon.ready(now) {
        return Ok(false);
    }
    weapon.mark_fired(now);
    let definition = weapon.definition.clone();
    let change = actor.set_state(ActorState::Attacking, now);

    ctx.emit_state_changes(shooter, change.as_slice());
    debug!(actor = %shooter, weapon = %definition.name, "weapon fired");
    ctx.emit(
        SimEventKind::WeaponFired {
            actor: shooter,
            weapon: definition.name.clone(),
        },
        format!("{shooter} fired {}", definition.name),
    );

    for _ in 0..definition.ray_count {
        fire_ray(ctx, shooter, &definition)?;
    }
    for _ in 0..definition.projectile_count {
        fire_projectile(ctx, shooter, &definition)?;
    }
    for _ in 0..definition.melee_count {
        swing(ctx, shooter, &definition);
    }
    Ok(true)
}

/// Perturb a facing by up to `cone` degrees in yaw and pitch.
fn spread<R: Rng + ?Sized>(rng: &mut R, facing: EulerAngles, cone: f32) -> EulerAngles {
    if cone <= 0.0 {
        return facing;
    }
    EulerAngles::new(
        facing.yaw + rng.random_range(-cone..=cone),
        facing.pitch + rng.random_range(-cone..=cone),
    )
}

fn fire_ray(
    ctx: &mut SimContext<'_>,
    shooter: ActorHandle,
    definition: &WeaponDefinition,
) -> SimResult<()> {
    let Some(actor) = ctx.world.resolve(shooter) else {
        return Ok(());
    };
    let facing = actor.orientation;
    let start = actor.eye_position() - facing.up() * RAY_DROP
        + facing.forward() * actor.definition.radius * 1.01;
    let direction = spread(ctx.rng, facing, definition.ray_cone).forward();

    let hit = ctx
        .world
        .raycast_all(start, direction, definition.ray_range, Some(shooter));
    if !hit.did_impact {
        return Ok(());
    }

    let effect = match hit.hit_actor {
        Some(target) => {
            let push = direction.truncate().normalize_or_zero().extend(0.0) * definition.ray_impulse;
            if let Some(victim) = ctx.world.resolve_mut(target) {
                victim.add_impulse(push);
            }
            let damage = definition.ray_damage.sample(ctx.rng);
            combat::apply_damage(ctx, target, damage, Some(shooter));
            definition.hit_actor_effect.as_deref()
        }
        None => definition.hit_wall_effect.as_deref(),
    };
    if let Some(name) = effect {
        ctx.spawn_actor(&SpawnInfo::new(name, hit.impact_position))?;
    }
    Ok(())
}

fn fire_projectile(
    ctx: &mut SimContext<'_>,
    shooter: ActorHandle,
    definition: &WeaponDefinition,
) -> SimResult<()> {
    let Some(projectile) = definition.projectile_actor.as_deref() else {
        return Ok(());
    };
    let Some(actor) = ctx.world.resolve(shooter) else {
        return Ok(());
    };
    let facing = actor.orientation;
    let position = actor.eye_position() - facing.up() * PROJECTILE_DROP
        + facing.forward() * actor.definition.radius * 1.5;
    let aim = spread(ctx.rng, facing, definition.projectile_cone);

    let spawn = SpawnInfo::new(projectile, position)
        .with_orientation(facing)
        .with_velocity(aim.forward() * definition.projectile_speed)
        .with_owner(shooter);
    ctx.spawn_actor(&spawn)?;
    Ok(())
}

/// Strike every hostile actor whose position falls in the melee sector.
fn swing(ctx: &mut SimContext<'_>, shooter: ActorHandle, definition: &WeaponDefinition) {
    let Some(actor) = ctx.world.resolve(shooter) else {
        return;
    };
    let forward: Vec2 = actor.forward_xy();
    let tip = actor.position.truncate() + forward * actor.definition.radius;
    let faction = actor.faction;

    let victims: Vec<ActorHandle> = ctx
        .world
        .living_actors()
        .filter(|other| other.handle != shooter && !other.is_projectile())
        .filter(|other| faction.is_hostile_to(other.faction))
        .filter(|other| {
            is_point_in_directed_sector(
                other.position.truncate(),
                tip,
                forward,
                definition.melee_arc * 0.5,
                definition.melee_range,
            )
        })
        .map(|other| other.handle)
        .collect();

    let push: Vec3 = forward.extend(0.0) * definition.melee_impulse;
    for victim in victims {
        let damage = definition.melee_damage.sample(ctx.rng);
        combat::apply_damage(ctx, victim, damage, Some(shooter));
        if let Some(target) = ctx.world.resolve_mut(victim) {
            target.add_impulse(push);
        }
    }
}
