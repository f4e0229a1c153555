//! Actor simulation core for Twinforge arenas.
//!
//! A frame-synchronous simulation over a tile map. Actors live in a
//! generation-checked arena and are addressed by [`ActorHandle`]s that go
//! stale when their actor is destroyed. Each frame runs the registered
//! [`System`]s in order: controllers (player respawn and AI), fixed-rate
//! physics, then lifecycle timers. Everything observable is recorded in
//! the [`EventLog`]; the simulation never renders or plays sounds itself.

/// AI target acquisition and pursuit.
pub mod ai;
/// Actor records, lifecycle states, and movement.
pub mod actor;
/// Generation-tagged slot storage for actors.
pub mod arena;
/// Frame clock, stopwatches, and the fixed physics timestep.
pub mod clock;
/// Damage, kill credit, and collision reactions.
pub mod combat;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each frame.
pub mod context;
/// Player and AI control of actors.
pub mod controller;
/// Data-driven actor, weapon, tile, and map definitions.
pub mod definition;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Weak actor references.
pub mod handle;
/// Timed state transitions and removal of dead actors.
pub mod lifecycle;
/// The tile grid.
pub mod map;
/// Fixed-rate integration and collision resolution.
pub mod physics;
/// Wall, floor, ceiling, and actor ray queries.
pub mod raycast;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The trait that all simulation systems implement.
pub mod system;
/// Weapons and fire modes.
pub mod weapon;
/// The map, its actors, and its players.
pub mod world;

/// Re-exports of [`actor::Actor`] and [`actor::ActorState`].
pub use actor::{Actor, ActorState};
/// Re-export of [`ai::AiController`].
pub use ai::AiController;
/// Re-export of [`arena::ActorArena`].
pub use arena::ActorArena;
/// Re-exports of the clock types.
pub use clock::{FixedTimestep, SimClock, Stopwatch};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of the controller types.
pub use controller::{Controller, ControllerSystem, PlayerController};
/// Re-exports of the definition types.
pub use definition::{ActorDefinition, Definitions, Faction, MapDefinition, SpawnInfo, WeaponDefinition};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`handle::ActorHandle`].
pub use handle::ActorHandle;
/// Re-export of [`lifecycle::LifecycleSystem`].
pub use lifecycle::LifecycleSystem;
/// Re-export of [`map::TileMap`].
pub use map::TileMap;
/// Re-export of [`physics::PhysicsSystem`].
pub use physics::PhysicsSystem;
/// Re-export of [`raycast::RaycastResult`].
pub use raycast::RaycastResult;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-export of [`weapon::Weapon`].
pub use weapon::Weapon;
/// Re-export of [`world::World`].
pub use world::World;
