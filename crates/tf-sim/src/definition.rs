//! Read-only actor, weapon, tile, and map definitions.
//!
//! Definitions are plain data deserialised from JSON and shared behind
//! [`Arc`]s. Nothing in the simulation mutates them.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tf_core::{EulerAngles, FloatRange};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::handle::ActorHandle;

const BUILTIN: &str = include_str!("../data/definitions.json");

/// Which side an actor fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Unaligned.
    #[default]
    None,
    /// The player's side.
    Marine,
    /// The monsters.
    Demon,
    /// Never damaged by collisions and never targeted.
    Neutral,
}

impl Faction {
    /// Factions are hostile when they differ and neither is neutral.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other && self != Faction::Neutral && other != Faction::Neutral
    }
}

/// How long each timed state lasts before the actor moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTimings {
    /// Seconds spent attacking before returning to walking.
    pub attack: f32,
    /// Seconds spent flinching after damage.
    pub hurt: f32,
    /// Seconds of death animation before a corpse may be removed.
    pub death: f32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            attack: 0.5,
            hurt: 0.3,
            death: 1.0,
        }
    }
}

/// Static parameters for one actor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorDefinition {
    /// Unique name used by spawns and weapons.
    pub name: String,
    /// Side the actor fights for.
    pub faction: Faction,
    /// Starting health.
    pub health: f32,
    /// Seconds a corpse lingers after dying.
    pub corpse_lifetime: f32,
    /// Seconds after spawning at which the actor dies outright.
    pub lifetime: Option<f32>,
    /// Spawn already dying (impact effects).
    pub die_on_spawn: bool,
    /// Fired by a weapon; projectiles never collide with each other.
    pub is_projectile: bool,
    /// Collision cylinder radius.
    pub radius: f32,
    /// Collision cylinder height.
    pub height: f32,
    /// Takes part in actor-vs-actor collision.
    pub collides_with_actors: bool,
    /// Takes part in actor-vs-map collision.
    pub collides_with_walls: bool,
    /// Dies on any collision.
    pub die_on_collide: bool,
    /// Impulse applied to whatever this actor runs into.
    pub impulse_on_collide: f32,
    /// Damage dealt to hostile actors this one runs into.
    pub damage_on_collide: FloatRange,
    /// Integrated by the physics step.
    pub simulated: bool,
    /// Pulled down while airborne.
    pub gravity: bool,
    /// Walking speed.
    pub walk_speed: f32,
    /// Running speed, used by AI pursuit.
    pub run_speed: f32,
    /// Drag coefficient applied while grounded.
    pub drag: f32,
    /// Maximum yaw rate in degrees per second.
    pub turn_speed: f32,
    /// Upward velocity added by a jump.
    pub jump_impulse: f32,
    /// Scale on impulses received from collisions.
    pub impulse_dampening: f32,
    /// Eye height above the actor's base.
    pub eye_height: f32,
    /// Spawns with its own AI controller.
    pub ai_enabled: bool,
    /// How far the AI can see.
    pub sight_radius: f32,
    /// Half-angle of the AI's sight cone in degrees.
    pub sight_angle: f32,
    /// Weapon names, first equipped.
    pub weapons: Vec<String>,
    /// Timed state durations.
    pub animations: AnimationTimings,
}

impl Default for ActorDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            faction: Faction::None,
            health: 1.0,
            corpse_lifetime: 0.0,
            lifetime: None,
            die_on_spawn: false,
            is_projectile: false,
            radius: 0.25,
            height: 0.75,
            collides_with_actors: true,
            collides_with_walls: true,
            die_on_collide: false,
            impulse_on_collide: 0.0,
            damage_on_collide: FloatRange::default(),
            simulated: true,
            gravity: false,
            walk_speed: 1.0,
            run_speed: 2.0,
            drag: 0.0,
            turn_speed: 180.0,
            jump_impulse: 0.0,
            impulse_dampening: 1.0,
            eye_height: 0.5,
            ai_enabled: false,
            sight_radius: 64.0,
            sight_angle: 60.0,
            weapons: Vec::new(),
            animations: AnimationTimings::default(),
        }
    }
}

/// Static parameters for one weapon type.
///
/// A weapon fires every mode whose count is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponDefinition {
    /// Unique name referenced by actor inventories.
    pub name: String,
    /// Minimum seconds between shots.
    pub refire_time: f32,
    /// Hit-scan rays per shot.
    pub ray_count: u32,
    /// Full spread of rays in degrees.
    pub ray_cone: f32,
    /// Maximum ray distance.
    pub ray_range: f32,
    /// Impulse given to an actor a ray hits.
    pub ray_impulse: f32,
    /// Damage dealt by each ray.
    pub ray_damage: FloatRange,
    /// Effect actor spawned where a ray strikes an actor.
    pub hit_actor_effect: Option<String>,
    /// Effect actor spawned where a ray strikes anything else.
    pub hit_wall_effect: Option<String>,
    /// Projectiles per shot.
    pub projectile_count: u32,
    /// Full spread of projectiles in degrees.
    pub projectile_cone: f32,
    /// Launch speed.
    pub projectile_speed: f32,
    /// Actor definition spawned as the projectile.
    pub projectile_actor: Option<String>,
    /// Melee strikes per attack.
    pub melee_count: u32,
    /// Reach of a strike from the attacker's front.
    pub melee_range: f32,
    /// Full width of a strike in degrees.
    pub melee_arc: f32,
    /// Impulse given to each actor struck.
    pub melee_impulse: f32,
    /// Damage dealt to each actor struck.
    pub melee_damage: FloatRange,
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            refire_time: 0.5,
            ray_count: 0,
            ray_cone: 0.0,
            ray_range: 10.0,
            ray_impulse: 0.0,
            ray_damage: FloatRange::default(),
            hit_actor_effect: None,
            hit_wall_effect: None,
            projectile_count: 0,
            projectile_cone: 0.0,
            projectile_speed: 10.0,
            projectile_actor: None,
            melee_count: 0,
            melee_range: 1.0,
            melee_arc: 90.0,
            melee_impulse: 0.0,
            melee_damage: FloatRange::default(),
        }
    }
}

/// A tile type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Display name.
    pub name: String,
    /// Character that places this tile in a map layout.
    pub glyph: char,
    /// Walls block movement and rays.
    #[serde(default)]
    pub solid: bool,
    /// Height of the tile's box.
    #[serde(default = "default_tile_height")]
    pub height: f32,
}

fn default_tile_height() -> f32 {
    1.0
}

/// Where and how to place an actor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnInfo {
    /// Actor definition name.
    pub actor: String,
    /// Base position.
    pub position: Vec3,
    /// Facing.
    pub orientation: EulerAngles,
    /// Initial velocity.
    pub velocity: Vec3,
    /// Actor that fired this one, for projectiles.
    #[serde(skip)]
    pub owner: Option<ActorHandle>,
}

impl SpawnInfo {
    /// Place the named actor at `position`.
    pub fn new(actor: impl Into<String>, position: Vec3) -> Self {
        Self {
            actor: actor.into(),
            position,
            ..Self::default()
        }
    }

    /// Face `yaw` degrees.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.orientation = EulerAngles::from_yaw(yaw);
        self
    }

    /// Set the full facing.
    pub fn with_orientation(mut self, orientation: EulerAngles) -> Self {
        self.orientation = orientation;
        self
    }

    /// Start moving with `velocity`.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Credit damage to `owner`, and never collide with it.
    pub fn with_owner(mut self, owner: ActorHandle) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// A playable map: a text layout plus what to spawn in it.
///
/// The first layout row is the northern edge, so row `r` of an
/// `h`-row layout covers tiles with `y == h - 1 - r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDefinition {
    /// Unique map name.
    pub name: String,
    /// One string per row, one glyph per tile.
    pub layout: Vec<String>,
    /// Height of the ceiling plane.
    pub ceiling_height: f32,
    /// Actors placed when the map loads.
    pub spawns: Vec<SpawnInfo>,
    /// Candidate positions for player actors.
    pub player_starts: Vec<SpawnInfo>,
    /// Actor definition spawned for players.
    pub player_actor: String,
}

impl Default for MapDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            layout: Vec::new(),
            ceiling_height: 1.0,
            spawns: Vec::new(),
            player_starts: Vec::new(),
            player_actor: "Marine".into(),
        }
    }
}

/// On-disk layout of a definitions file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DefinitionFile {
    tiles: Vec<TileDefinition>,
    actors: Vec<ActorDefinition>,
    weapons: Vec<WeaponDefinition>,
    maps: Vec<MapDefinition>,
}

/// Every definition the simulation can refer to, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    tiles: Vec<TileDefinition>,
    actors: BTreeMap<String, Arc<ActorDefinition>>,
    weapons: BTreeMap<String, Arc<WeaponDefinition>>,
    maps: BTreeMap<String, MapDefinition>,
}

impl Definitions {
    /// The definitions embedded in this crate.
    pub fn builtin() -> SimResult<Self> {
        Self::from_json_str(BUILTIN)
    }

    /// Parse and cross-check a definitions document.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let file: DefinitionFile = serde_json::from_str(json)?;
        let mut defs = Self::default();

        for tile in file.tiles {
            if defs.tiles.iter().any(|t| t.glyph == tile.glyph) {
                return Err(SimError::DuplicateDefinition {
                    kind: "tile glyph",
                    name: tile.glyph.to_string(),
                });
            }
            defs.tiles.push(tile);
        }
        for weapon in file.weapons {
            let name = weapon.name.clone();
            if defs.weapons.insert(name.clone(), Arc::new(weapon)).is_some() {
                return Err(SimError::DuplicateDefinition { kind: "weapon", name });
            }
        }
        for actor in file.actors {
            let name = actor.name.clone();
            if defs.actors.insert(name.clone(), Arc::new(actor)).is_some() {
                return Err(SimError::DuplicateDefinition { kind: "actor", name });
            }
        }
        for map in file.maps {
            let name = map.name.clone();
            if defs.maps.insert(name.clone(), map).is_some() {
                return Err(SimError::DuplicateDefinition { kind: "map", name });
            }
        }

        defs.check_references()?;
        debug!(
            tiles = defs.tiles.len(),
            actors = defs.actors.len(),
            weapons = defs.weapons.len(),
            maps = defs.maps.len(),
            "definitions loaded"
        );
        Ok(defs)
    }

    fn check_references(&self) -> SimResult<()> {
        for actor in self.actors.values() {
            for weapon in &actor.weapons {
                self.weapon(weapon)?;
            }
        }
        for weapon in self.weapons.values() {
            let effects = [
                weapon.projectile_actor.as_ref(),
                weapon.hit_actor_effect.as_ref(),
                weapon.hit_wall_effect.as_ref(),
            ];
            for name in effects.into_iter().flatten() {
                self.actor(name)?;
            }
            if weapon.projectile_count > 0 && weapon.projectile_actor.is_none() {
                return Err(SimError::UnknownActor(format!(
                    "(projectile for weapon {})",
                    weapon.name
                )));
            }
        }
        for map in self.maps.values() {
            for spawn in map.spawns.iter().chain(&map.player_starts) {
                self.actor(&spawn.actor)?;
            }
            if !map.player_starts.is_empty() {
                self.actor(&map.player_actor)?;
            }
        }
        Ok(())
    }

    /// Look up an actor definition by name.
    pub fn actor(&self, name: &str) -> SimResult<&Arc<ActorDefinition>> {
        self.actors
            .get(name)
            .ok_or_else(|| SimError::UnknownActor(name.to_string()))
    }

    /// Look up a weapon definition by name.
    pub fn weapon(&self, name: &str) -> SimResult<&Arc<WeaponDefinition>> {
        self.weapons
            .get(name)
            .ok_or_else(|| SimError::UnknownWeapon(name.to_string()))
    }

    /// Look up a map definition by name.
    pub fn map(&self, name: &str) -> SimResult<&MapDefinition> {
        self.maps
            .get(name)
            .ok_or_else(|| SimError::UnknownMap(name.to_string()))
    }

    /// Tile definitions in declaration order.
    pub fn tiles(&self) -> &[TileDefinition] {
        &self.tiles
    }

    /// Actor definitions in name order.
    pub fn actors(&self) -> impl Iterator<Item = &Arc<ActorDefinition>> {
        self.actors.values()
    }

    /// Weapon definitions in name order.
    pub fn weapons(&self) -> impl Iterator<Item = &Arc<WeaponDefinition>> {
        self.weapons.values()
    }

    /// Map definitions in name order.
    pub fn maps(&self) -> impl Iterator<Item = &MapDefinition> {
        self.maps.values()
    }
}
