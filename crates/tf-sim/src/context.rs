use rand::rngs::StdRng;
use tracing::debug;

use crate::actor::StateChange;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::definition::SpawnInfo;
use crate::error::SimResult;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::handle::ActorHandle;
use crate::world::World;

/// Mutable context passed to each system during a frame.
pub struct SimContext<'a> {
    /// Map, actors, and players.
    pub world: &'a mut World,
    /// Frame and time bookkeeping.
    pub clock: &'a SimClock,
    /// Where observable events go.
    pub events: &'a mut EventLog,
    /// The run's only source of randomness.
    pub rng: &'a mut StdRng,
    /// Run settings.
    pub config: &'a SimConfig,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current frame.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.frame(), kind, description));
    }

    /// Simulated seconds since the run began.
    pub fn now(&self) -> f64 {
        self.clock.seconds()
    }

    /// Duration of the current frame in seconds.
    pub fn frame_seconds(&self) -> f32 {
        self.clock.delta() as f32
    }

    /// Spawn an actor now and announce it.
    pub fn spawn_actor(&mut self, info: &SpawnInfo) -> SimResult<ActorHandle> {
        let handle = self.world.spawn_actor(info, self.now())?;
        debug!(actor = %handle, definition = %info.actor, "spawned actor");
        self.emit(
            SimEventKind::Spawned {
                actor: handle,
                definition: info.actor.clone(),
            },
            format!("{} spawned as {handle}", info.actor),
        );
        Ok(handle)
    }

    /// Record state changes made to an actor.
    pub fn emit_state_changes(&mut self, actor: ActorHandle, changes: &[StateChange]) {
        for &(from, to) in changes {
            self.emit(
                SimEventKind::StateChanged { actor, from, to },
                format!("{actor} {from} -> {to}"),
            );
        }
    }
}
