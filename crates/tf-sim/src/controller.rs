//! Who drives an actor, and the system that runs the drivers.

use rand::Rng;
use tracing::{debug, info};

use crate::ai;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::handle::ActorHandle;
use crate::system::System;
use crate::world::World;

/// The capability currently steering an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Controller {
    /// Nothing: the actor only reacts to physics.
    #[default]
    None,
    /// A human player, by index into [`World::players`].
    Human {
        /// Player index.
        player: usize,
    },
    /// The actor's own [`ai::AiController`].
    Ai,
}

/// A human player's seat in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerController {
    /// The possessed actor, which may have gone stale.
    pub actor: ActorHandle,
    /// Other players' actors this player has killed.
    pub kills: u32,
    /// Times this player's actor has died.
    pub deaths: u32,
}

impl PlayerController {
    /// A player with no actor yet.
    pub fn new() -> Self {
        Self {
            actor: ActorHandle::INVALID,
            kills: 0,
            deaths: 0,
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Give `player` control of an actor, releasing whatever it drove before.
    ///
    /// Fails if the player does not exist, the actor is gone or dying, or
    /// another player already drives it.
    pub fn possess(&mut self, player: usize, handle: ActorHandle) -> bool {
        if player >= self.players.len() {
            return false;
        }
        let available = self.resolve(handle).is_some_and(|actor| {
            actor.is_alive()
                && match actor.controller {
                    Controller::Human { player: other } => other == player,
                    _ => true,
                }
        });
        if !available {
            return false;
        }
        if self.players[player].actor != handle {
            self.unpossess(player);
        }
        if let Some(actor) = self.resolve_mut(handle) {
            actor.controller = Controller::Human { player };
        }
        self.players[player].actor = handle;
        true
    }

    /// Release the player's actor back to its own AI, if it has one.
    pub fn unpossess(&mut self, player: usize) {
        let Some(seat) = self.players.get_mut(player) else {
            return;
        };
        let handle = std::mem::replace(&mut seat.actor, ActorHandle::INVALID);
        if let Some(actor) = self.resolve_mut(handle) {
            actor.controller = if actor.ai.is_some() {
                Controller::Ai
            } else {
                Controller::None
            };
        }
    }

    /// The player driving an actor, if any.
    pub fn player_for(&self, handle: ActorHandle) -> Option<usize> {
        match self.resolve(handle)?.controller {
            Controller::Human { player } => Some(player),
            _ => None,
        }
    }
}

/// Respawns players whose actor is gone and thinks for AI actors.
#[derive(Debug, Default)]
pub struct ControllerSystem;

impl ControllerSystem {
    /// A controller system.
    pub fn new() -> Self {
        Self
    }

    fn respawn_players(&self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for player in 0..ctx.world.players.len() {
            let current = ctx.world.players[player].actor;
            if ctx.world.resolve(current).is_some() {
                continue;
            }
            let starts = ctx.world.player_starts();
            if starts.is_empty() {
                return Err(SimError::NoPlayerStart(ctx.world.map.name().to_string()));
            }
            let index = ctx.rng.random_range(0..starts.len());
            let mut spawn = starts[index].clone();
            spawn.actor = ctx.world.player_actor().to_string();

            let handle = ctx.spawn_actor(&spawn)?;
            ctx.world.possess(player, handle);
            info!(player, actor = %handle, "player respawned");
            ctx.emit(
                SimEventKind::Possessed {
                    player,
                    actor: handle,
                },
                format!("player {player} possessed {handle}"),
            );
        }
        Ok(())
    }
}

impl System for ControllerSystem {
    fn name(&self) -> &str {
        "controller"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.respawn_players(ctx)?;
        if !ctx.config.ai_enabled {
            return Ok(());
        }
        for handle in ctx.world.actors.handles() {
            let thinks = ctx
                .world
                .resolve(handle)
                .is_some_and(|a| a.is_alive() && a.controller == Controller::Ai);
            if thinks {
                ai::update_ai(ctx, handle)?;
            }
        }
        debug!(frame = ctx.clock.frame(), "controllers updated");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glam::Vec3;

    use crate::definition::{Definitions, SpawnInfo};

    fn world_with_two_actors() -> (World, ActorHandle, ActorHandle) {
        let defs = Arc::new(Definitions::builtin().unwrap());
        let mut world = World::new(defs, "Arena").unwrap();
        let marine = world
            .spawn_actor(&SpawnInfo::new("Marine", Vec3::new(2.5, 2.5, 0.0)), 0.0)
            .unwrap();
        let demon = world
            .spawn_actor(&SpawnInfo::new("Demon", Vec3::new(9.5, 2.5, 0.0)), 0.0)
            .unwrap();
        world.players.push(PlayerController::new());
        (world, marine, demon)
    }

    #[test]
    fn ai_actors_start_under_ai_control() {
        let (world, marine, _) = world_with_two_actors();
        assert_eq!(world.resolve(marine).unwrap().controller, Controller::Ai);
        assert_eq!(world.player_for(marine), None);
    }

    #[test]
    fn possess_and_unpossess() {
        let (mut world, marine, demon) = world_with_two_actors();
        assert!(world.possess(0, marine));
        assert!(world.resolve(marine).unwrap().is_player_controlled());
        assert_eq!(world.player_for(marine), Some(0));

        // Switching bodies hands the old one back to its AI.
        assert!(world.possess(0, demon));
        assert_eq!(world.resolve(marine).unwrap().controller, Controller::Ai);
        assert_eq!(world.players[0].actor, demon);

        world.unpossess(0);
        assert_eq!(world.resolve(demon).unwrap().controller, Controller::Ai);
        assert!(!world.players[0].actor.is_valid());
    }

    #[test]
    fn cannot_possess_missing_or_taken_actors() {
        let (mut world, marine, _) = world_with_two_actors();
        assert!(!world.possess(3, marine));
        assert!(!world.possess(0, ActorHandle::INVALID));

        world.players.push(PlayerController::new());
        assert!(world.possess(0, marine));
        assert!(!world.possess(1, marine));
        assert_eq!(world.player_for(marine), Some(0));
    }

    #[test]
    fn actor_without_ai_reverts_to_none() {
        let (mut world, _, _) = world_with_two_actors();
        let effect = world
            .spawn_actor(&SpawnInfo::new("PlasmaProjectile", Vec3::new(5.5, 5.5, 0.5)), 0.0)
            .unwrap();
        assert!(world.possess(0, effect));
        world.unpossess(0);
        assert_eq!(world.resolve(effect).unwrap().controller, Controller::None);
    }
}
