use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::clock::SimClock;
use crate::combat;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::controller::{Controller, ControllerSystem, PlayerController};
use crate::definition::Definitions;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEventKind};
use crate::handle::ActorHandle;
use crate::lifecycle::LifecycleSystem;
use crate::physics::PhysicsSystem;
use crate::system::System;
use crate::world::World;

/// The top-level simulation orchestrator.
///
/// Owns the world, clock, RNG, event log, and registered systems, and
/// drives the frame loop. The standard systems run in this order:
/// controllers, physics, lifecycle.
pub struct Simulation {
    world: World,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    config: SimConfig,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("frame", &self.clock.frame())
            .field("actors", &self.world.actors.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Build the named map, populate it from its spawn list, and register
    /// the standard systems.
    pub fn new(definitions: Arc<Definitions>, map_name: &str, config: SimConfig) -> SimResult<Self> {
        let spawns = definitions.map(map_name)?.spawns.clone();
        let world = World::new(definitions, map_name)?;
        let mut sim = Self::from_world(world, config)?;
        sim.with_context(|ctx| {
            for spawn in &spawns {
                ctx.spawn_actor(spawn)?;
            }
            Ok::<_, SimError>(())
        })?;
        info!(map = map_name, actors = sim.world.actors.len(), "simulation ready");
        Ok(sim)
    }

    /// Wrap an existing world with the standard systems. Nothing is spawned.
    pub fn from_world(world: World, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut sim = Self {
            world,
            clock: SimClock::new(),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            systems: Vec::new(),
            initialized: false,
            config,
        };
        sim.add_system(ControllerSystem::new());
        sim.add_system(PhysicsSystem::new(sim.config.physics_hz));
        sim.add_system(LifecycleSystem::new());
        Ok(sim)
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = self.with_context(|ctx| system.init(ctx));
            self.systems[i] = system;
            result?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one frame of `delta` seconds.
    pub fn update(&mut self, delta: f64) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        self.clock.advance(delta);

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let result = self.with_context(|ctx| system.tick(ctx));
            self.systems[i] = system;
            result?;
        }
        Ok(())
    }

    /// Run `seconds` of simulated time at a steady `fps`. Returns the
    /// number of frames run.
    pub fn run_for(&mut self, seconds: f64, fps: u32) -> SimResult<u64> {
        if fps == 0 {
            return Err(SimError::InvalidConfig("frame rate must be positive".into()));
        }
        let frames = (seconds.max(0.0) * f64::from(fps)).round() as u64;
        let delta = 1.0 / f64::from(fps);
        for _ in 0..frames {
            self.update(delta)?;
        }
        Ok(frames)
    }

    /// Borrow the simulation's state as a system would see it.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut SimContext<'_>) -> R) -> R {
        let mut ctx = SimContext {
            world: &mut self.world,
            clock: &self.clock,
            events: &mut self.events,
            rng: &mut self.rng,
            config: &self.config,
        };
        f(&mut ctx)
    }

    /// Seat a new human player. Their actor spawns on the next frame.
    pub fn add_player(&mut self) -> usize {
        self.world.players.push(PlayerController::new());
        self.world.players.len() - 1
    }

    /// Debug: kill every living actor not driven by a player.
    ///
    /// Returns how many died.
    pub fn kill_all(&mut self) -> usize {
        self.with_context(|ctx| {
            let victims: Vec<(ActorHandle, f32)> = ctx
                .world
                .living_actors()
                .filter(|a| !a.is_player_controlled())
                .map(|a| (a.handle, a.health))
                .collect();
            let mut killed = 0;
            for (handle, health) in victims {
                if combat::apply_damage(ctx, handle, health.max(1.0), None) {
                    killed += 1;
                }
            }
            killed
        })
    }

    /// Debug: move `player` into the next living actor after its current
    /// one, in slot order. Projectiles and other players' actors are skipped.
    pub fn possess_next(&mut self, player: usize) -> SimResult<Option<ActorHandle>> {
        let current = self
            .world
            .players
            .get(player)
            .ok_or(SimError::UnknownPlayer(player))?
            .actor;

        let candidates: Vec<ActorHandle> = self
            .world
            .living_actors()
            .filter(|a| !a.is_projectile() && a.definition.radius > 0.0)
            .filter(|a| match a.controller {
                Controller::Human { player: other } => other == player,
                _ => true,
            })
            .map(|a| a.handle)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        let start = candidates
            .iter()
            .position(|&h| h == current)
            .map_or(0, |i| (i + 1) % candidates.len());
        let next = candidates[start];

        if !self.world.possess(player, next) {
            return Ok(None);
        }
        self.with_context(|ctx| {
            ctx.emit(
                SimEventKind::Possessed {
                    player,
                    actor: next,
                },
                format!("player {player} possessed {next}"),
            );
        });
        Ok(Some(next))
    }

    /// The world being simulated.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
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
    use glam::Vec3;

    use crate::actor::ActorState;
    use crate::definition::SpawnInfo;
    use crate::map::TileMap;

    fn defs() -> Arc<Definitions> {
        Arc::new(Definitions::builtin().unwrap())
    }

    fn arena(config: SimConfig) -> Simulation {
        Simulation::new(defs(), "Arena", config).unwrap()
    }

    fn room_sim(config: SimConfig) -> Simulation {
        let defs = defs();
        let layout = ["#########", "#.......#", "#.......#", "#.......#", "#########"];
        let map = TileMap::from_layout("room", &layout, defs.tiles(), 1.0).unwrap();
        Simulation::from_world(World::with_map(defs, map), config).unwrap()
    }

    #[test]
    fn new_spawns_map_actors() {
        let sim = arena(SimConfig::default());
        assert_eq!(sim.world().actors.len(), 3);
        assert_eq!(sim.events().count("spawned"), 3);
    }

    #[test]
    fn unknown_map_is_an_error() {
        let err = Simulation::new(defs(), "Nowhere", SimConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::UnknownMap(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Simulation::new(defs(), "Arena", SimConfig::default().with_physics_hz(0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn physics_steps_follow_elapsed_time() {
        let mut sim = arena(SimConfig::default().with_ai(false));
        sim.run_for(1.0, 60).unwrap();
        assert_eq!(sim.clock().frame(), 60);
        assert_eq!(sim.get_system::<PhysicsSystem>().unwrap().steps_run(), 240);
    }

    #[test]
    fn custom_system_registration() {
        #[derive(Debug)]
        struct CustomSystem {
            ticked: bool,
        }
        impl System for CustomSystem {
            fn name(&self) -> &str {
                "custom"
            }
            fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
                self.ticked = true;
                Ok(())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut sim = arena(SimConfig::default());
        sim.add_system(CustomSystem { ticked: false });
        sim.update(1.0 / 60.0).unwrap();
        assert!(sim.get_system::<CustomSystem>().unwrap().ticked);
    }

    #[test]
    fn deterministic_runs() {
        let run = || {
            let mut sim = arena(SimConfig::default().with_seed(9));
            sim.run_for(5.0, 30).unwrap();
            sim.events()
                .events()
                .iter()
                .map(|e| e.description.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn demon_closes_in_and_attacks() {
        let mut sim = room_sim(SimConfig::default());
        let (demon, marine) = sim.with_context(|ctx| {
            let demon = ctx
                .spawn_actor(&SpawnInfo::new("Demon", Vec3::new(1.5, 2.5, 0.0)))
                .unwrap();
            let marine = ctx
                .spawn_actor(&SpawnInfo::new("Marine", Vec3::new(6.5, 2.5, 0.0)).with_yaw(90.0))
                .unwrap();
            (demon, marine)
        });
        // Keep the marine passive so only the demon acts.
        sim.world_mut().resolve_mut(marine).unwrap().controller = Controller::None;

        sim.run_for(4.0, 60).unwrap();

        assert_eq!(sim.world().resolve(demon).unwrap().ai.unwrap().target, marine);
        assert!(sim.events().count("target") >= 1);
        assert!(sim.events().count("fired") >= 1);
        let marine_actor = sim.world().resolve(marine).unwrap();
        assert!(marine_actor.health < 100.0);
    }

    #[test]
    fn dead_actors_are_removed_and_handles_go_stale() {
        let mut sim = arena(SimConfig::default().with_ai(false));
        let killed = sim.kill_all();
        assert_eq!(killed, 3);
        let handles = sim.world().actors.handles();
        assert!(
            sim.world()
                .actors
                .iter()
                .all(|a| a.state() == ActorState::Dying)
        );

        // Demon corpses linger two seconds.
        sim.run_for(3.0, 60).unwrap();
        assert!(sim.world().actors.is_empty());
        assert!(handles.iter().all(|&h| sim.world().resolve(h).is_none()));
        assert_eq!(sim.events().count("destroyed"), 3);
        assert_eq!(sim.get_system::<LifecycleSystem>().unwrap().removed(), 3);
    }

    #[test]
    fn effects_die_and_vanish() {
        let mut sim = room_sim(SimConfig::default());
        let splat = sim.with_context(|ctx| {
            ctx.spawn_actor(&SpawnInfo::new("BloodSplatter", Vec3::new(2.5, 2.5, 0.3)))
                .unwrap()
        });
        assert_eq!(sim.world().resolve(splat).unwrap().state(), ActorState::Dying);
        sim.run_for(0.5, 60).unwrap();
        assert!(sim.world().resolve(splat).is_none());
    }

    #[test]
    fn projectiles_expire() {
        let mut sim = room_sim(SimConfig::default());
        let bolt = sim.with_context(|ctx| {
            ctx.spawn_actor(&SpawnInfo::new("PlasmaProjectile", Vec3::new(2.5, 2.5, 0.4)))
                .unwrap()
        });
        sim.run_for(4.9, 60).unwrap();
        assert!(sim.world().resolve(bolt).is_some());
        sim.run_for(0.2, 60).unwrap();
        assert!(sim.world().resolve(bolt).is_none());
    }

    #[test]
    fn players_spawn_and_respawn() {
        let mut sim = arena(SimConfig::default().with_ai(false));
        let player = sim.add_player();
        sim.update(1.0 / 60.0).unwrap();

        let first = sim.world().players[player].actor;
        let body = sim.world().resolve(first).unwrap();
        assert_eq!(body.name(), "Marine");
        assert!(body.is_player_controlled());
        assert_eq!(sim.events().count("possessed"), 1);

        sim.with_context(|ctx| combat::apply_damage(ctx, first, 1000.0, None));
        assert_eq!(sim.world().players[player].deaths, 1);
        sim.run_for(3.0, 60).unwrap();

        let second = sim.world().players[player].actor;
        assert_ne!(first, second);
        assert!(sim.world().resolve(first).is_none());
        assert!(sim.world().resolve(second).is_some());
    }

    #[test]
    fn respawn_without_player_starts_fails() {
        let mut sim = room_sim(SimConfig::default());
        sim.add_player();
        let err = sim.update(1.0 / 60.0).unwrap_err();
        assert!(matches!(err, SimError::NoPlayerStart(_)));
    }

    #[test]
    fn kill_all_spares_players() {
        let mut sim = arena(SimConfig::default().with_ai(false));
        let player = sim.add_player();
        sim.update(1.0 / 60.0).unwrap();
        assert_eq!(sim.kill_all(), 3);
        let body = sim.world().players[player].actor;
        assert!(sim.world().resolve(body).unwrap().is_alive());
    }

    #[test]
    fn possess_next_cycles_through_actors() {
        let mut sim = arena(SimConfig::default().with_ai(false));
        let player = sim.add_player();
        let handles = sim.world().actors.handles();

        let first = sim.possess_next(player).unwrap().unwrap();
        assert_eq!(first, handles[0]);
        let second = sim.possess_next(player).unwrap().unwrap();
        assert_eq!(second, handles[1]);
        assert_eq!(sim.world().resolve(first).unwrap().controller, Controller::Ai);
        assert!(matches!(sim.possess_next(7), Err(SimError::UnknownPlayer(7))));
    }
}
