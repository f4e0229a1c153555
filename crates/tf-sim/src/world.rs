use std::sync::Arc;

use crate::actor::Actor;
use crate::arena::ActorArena;
use crate::controller::PlayerController;
use crate::definition::{Definitions, SpawnInfo};
use crate::error::SimResult;
use crate::handle::ActorHandle;
use crate::map::TileMap;
use crate::weapon::Weapon;

/// Everything the systems operate on: the map, its actors, and the
/// players driving some of them.
#[derive(Debug)]
pub struct World {
    definitions: Arc<Definitions>,
    /// The immutable tile grid.
    pub map: TileMap,
    /// Every actor, addressed by handle.
    pub actors: ActorArena,
    /// Human player controllers, indexed by player number.
    pub players: Vec<PlayerController>,
    player_starts: Vec<SpawnInfo>,
    player_actor: String,
}

impl World {
    /// Build the named map. Actors are not spawned yet.
    pub fn new(definitions: Arc<Definitions>, map_name: &str) -> SimResult<Self> {
        let map_def = definitions.map(map_name)?;
        let map = TileMap::from_definition(&definitions, map_def)?;
        let player_starts = map_def.player_starts.clone();
        let player_actor = map_def.player_actor.clone();
        Ok(Self {
            definitions,
            map,
            actors: ActorArena::new(),
            players: Vec::new(),
            player_starts,
            player_actor,
        })
    }

    /// A world around an existing grid, for tests and tools.
    pub fn with_map(definitions: Arc<Definitions>, map: TileMap) -> Self {
        Self {
            definitions,
            map,
            actors: ActorArena::new(),
            players: Vec::new(),
            player_starts: Vec::new(),
            player_actor: "Marine".into(),
        }
    }

    /// Every loaded definition.
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Where players may be placed.
    pub fn player_starts(&self) -> &[SpawnInfo] {
        &self.player_starts
    }

    /// Definition name used for player actors.
    pub fn player_actor(&self) -> &str {
        &self.player_actor
    }

    /// Create an actor from a spawn description at simulated time `now`.
    ///
    /// Actors spawned with an owner fight for the owner's faction.
    pub fn spawn_actor(&mut self, info: &SpawnInfo, now: f64) -> SimResult<ActorHandle> {
        let definition = self.definitions.actor(&info.actor)?.clone();
        let weapons = definition
            .weapons
            .iter()
            .map(|name| self.definitions.weapon(name).map(|w| Weapon::new(w.clone())))
            .collect::<SimResult<Vec<_>>>()?;
        let owner_faction = info
            .owner
            .and_then(|owner| self.actors.resolve(owner))
            .map(|owner| owner.faction);

        self.actors.insert_with(|handle| {
            let mut actor = Actor::new(handle, definition, weapons, info.position, info.orientation, now);
            actor.velocity = info.velocity;
            actor.owner = info.owner;
            if let Some(faction) = owner_faction {
                actor.faction = faction;
            }
            actor
        })
    }

    /// The actor behind `handle`, unless it has been removed.
    pub fn resolve(&self, handle: ActorHandle) -> Option<&Actor> {
        self.actors.resolve(handle)
    }

    /// Mutable counterpart of [`World::resolve`].
    pub fn resolve_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        self.actors.resolve_mut(handle)
    }

    /// The actor responsible for another's actions: a projectile's owner,
    /// or the actor itself.
    pub fn responsible_for(&self, handle: ActorHandle) -> ActorHandle {
        self.resolve(handle)
            .filter(|a| a.is_projectile())
            .and_then(|a| a.owner)
            .unwrap_or(handle)
    }

    /// Live (not dying or dead) actors.
    pub fn living_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.is_alive())
    }
}
