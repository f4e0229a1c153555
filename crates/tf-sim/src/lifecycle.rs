//! Timed state transitions and removal of dead actors.

use tracing::debug;

use crate::actor::ActorState;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Advances every actor's state timers and frees the slots of the dead.
#[derive(Debug, Default)]
pub struct LifecycleSystem {
    removed: u64,
}

impl LifecycleSystem {
    /// A lifecycle system with nothing removed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Actors removed so far.
    pub fn removed(&self) -> u64 {
        self.removed
    }
}

impl System for LifecycleSystem {
    fn name(&self) -> &str {
        "lifecycle"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let now = ctx.now();
        for handle in ctx.world.actors.handles() {
            let Some(actor) = ctx.world.resolve_mut(handle) else {
                continue;
            };
            let changes = actor.update_lifecycle(now);
            let dead = actor.state() == ActorState::Dead;
            ctx.emit_state_changes(handle, &changes);

            if dead && ctx.world.actors.remove(handle).is_some() {
                self.removed += 1;
                debug!(actor = %handle, "actor destroyed");
                ctx.emit(
                    SimEventKind::Destroyed { actor: handle },
                    format!("{handle} destroyed"),
                );
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
