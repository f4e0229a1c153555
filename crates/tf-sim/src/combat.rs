//! Damage, death credit, and collision reactions.

use tracing::{debug, info};

use crate::actor::ActorState;
use crate::context::SimContext;
use crate::controller::Controller;
use crate::event::SimEventKind;
use crate::handle::ActorHandle;

/// Hurt an actor. Returns whether this blow killed it.
///
/// The responsible attacker (a projectile's owner rather than the
/// projectile) becomes the victim's AI target. Dropping below one health
/// sends the victim straight to `Dying` and settles player kill and
/// death counts.
pub fn apply_damage(
    ctx: &mut SimContext<'_>,
    target: ActorHandle,
    amount: f32,
    attacker: Option<ActorHandle>,
) -> bool {
    let responsible = attacker.map(|a| ctx.world.responsible_for(a));
    let now = ctx.now();
    let Some(victim) = ctx.world.resolve_mut(target) else {
        return false;
    };
    if !victim.is_alive() {
        return false;
    }

    victim.health -= amount;
    let retaliate_against = responsible.filter(|&by| by != target);
    if let (Some(ai), Some(by)) = (victim.ai.as_mut(), retaliate_against) {
        ai.damaged_by(by);
    }
    let killed = victim.health < 1.0;
    let change = if killed {
        victim.set_state(ActorState::Dying, now)
    } else if amount > 0.0 {
        victim.set_state(ActorState::Hurting, now)
    } else {
        None
    };
    let victim_player = match victim.controller {
        Controller::Human { player } => Some(player),
        _ => None,
    };
    let remaining = victim.health;

    ctx.emit_state_changes(target, change.as_slice());
    debug!(actor = %target, amount, remaining, "damaged");
    ctx.emit(
        SimEventKind::Damaged {
            actor: target,
            attacker: responsible,
            amount,
        },
        format!("{target} took {amount:.1} damage"),
    );
    if !killed {
        return false;
    }

    info!(actor = %target, killer = ?responsible, "killed");
    ctx.emit(
        SimEventKind::Killed {
            actor: target,
            killer: responsible,
        },
        match responsible {
            Some(by) => format!("{target} killed by {by}"),
            None => format!("{target} killed"),
        },
    );
    if let Some(player) = victim_player {
        ctx.world.players[player].deaths += 1;
        let killer_player = responsible.and_then(|by| ctx.world.player_for(by));
        if let Some(killer) = killer_player.filter(|&k| k != player) {
            ctx.world.players[killer].kills += 1;
        }
    }
    true
}

/// React to `mover` running into `other`, or into the map when `other` is
/// `None`.
///
/// The struck actor is shoved along the mover's facing and, if the two
/// are hostile, takes the mover's collision damage. Movers that die on
/// contact start dying.
pub fn on_collide(ctx: &mut SimContext<'_>, mover: ActorHandle, other: Option<ActorHandle>) {
    let Some(actor) = ctx.world.resolve(mover) else {
        return;
    };
    let definition = actor.definition.clone();
    let faction = actor.faction;
    let push = actor.forward_xy().normalize_or_zero().extend(0.0) * definition.impulse_on_collide;

    if let Some(struck) = other.and_then(|h| ctx.world.resolve_mut(h)) {
        let dampening = struck.definition.impulse_dampening;
        struck.add_impulse(push * dampening);
        let hostile = faction.is_hostile_to(struck.faction);
        let struck_handle = struck.handle;
        if hostile {
            let amount = definition.damage_on_collide.sample(ctx.rng);
            if amount > 0.0 {
                apply_damage(ctx, struck_handle, amount, Some(mover));
            }
        }
    }

    if definition.die_on_collide {
        let now = ctx.now();
        let change = ctx
            .world
            .resolve_mut(mover)
            .and_then(|a| a.set_state(ActorState::Dying, now));
        ctx.emit_state_changes(mover, change.as_slice());
    }
}
