//! Generation-tagged slot storage for actors.

use crate::actor::Actor;
use crate::error::{SimError, SimResult};
use crate::handle::ActorHandle;

/// Highest slot index the arena will issue.
const MAX_SLOTS: usize = ActorHandle::RESERVED as usize;

#[derive(Debug, Default)]
struct Slot {
    generation: u16,
    actor: Option<Actor>,
}

/// Owns every actor. Slots are reused first-free; each slot's generation
/// is bumped exactly once when its occupant is removed.
#[derive(Debug, Default)]
pub struct ActorArena {
    slots: Vec<Slot>,
    live: usize,
}

impl ActorArena {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new actor, building it with the handle it will be known by.
    pub fn insert_with(&mut self, make: impl FnOnce(ActorHandle) -> Actor) -> SimResult<ActorHandle> {
        let index = match self.slots.iter().position(|s| s.actor.is_none()) {
            Some(index) => index,
            None => {
                if self.slots.len() >= MAX_SLOTS {
                    return Err(SimError::SlotsExhausted(self.live));
                }
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        let handle = ActorHandle::new(slot.generation, index as u16);
        slot.actor = Some(make(handle));
        self.live += 1;
        Ok(handle)
    }

    /// The actor a handle refers to, if it is still alive in its slot.
    pub fn resolve(&self, handle: ActorHandle) -> Option<&Actor> {
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get(usize::from(handle.index()))?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.actor.as_ref()
    }

    /// Mutable counterpart of [`ActorArena::resolve`].
    pub fn resolve_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        if !handle.is_valid() {
            return None;
        }
        let slot = self.slots.get_mut(usize::from(handle.index()))?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.actor.as_mut()
    }

    /// Remove an actor and retire its handle.
    pub fn remove(&mut self, handle: ActorHandle) -> Option<Actor> {
        self.resolve(handle)?;
        let slot = &mut self.slots[usize::from(handle.index())];
        let actor = slot.actor.take();
        slot.generation = next_generation(slot.generation);
        self.live -= 1;
        actor
    }

    /// Handles of all occupied slots in slot order.
    pub fn handles(&self) -> Vec<ActorHandle> {
        self.iter().map(|a| a.handle).collect()
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.slots.iter().filter_map(|s| s.actor.as_ref())
    }

    /// Mutable iteration over occupied slots in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.slots.iter_mut().filter_map(|s| s.actor.as_mut())
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever allocated, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

fn next_generation(generation: u16) -> u16 {
    match generation.wrapping_add(1) {
        ActorHandle::RESERVED => 0,
        next => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Definitions;

    fn dummy(handle: ActorHandle) -> Actor {
        let defs = Definitions::builtin().unwrap();
        let def = defs.actor("Demon").unwrap().clone();
        Actor::new(handle, def, Vec::new(), glam::Vec3::ZERO, Default::default(), 0.0)
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut arena = ActorArena::new();
        let first = arena.insert_with(dummy).unwrap();
        assert!(arena.resolve(first).is_some());
        assert!(arena.remove(first).is_some());
        assert!(arena.resolve(first).is_none());

        let second = arena.insert_with(dummy).unwrap();
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(arena.resolve(first).is_none());
        assert_eq!(arena.resolve(second).unwrap().handle, second);
    }

    #[test]
    fn invalid_handle_never_resolves() {
        let mut arena = ActorArena::new();
        arena.insert_with(dummy).unwrap();
        assert!(arena.resolve(ActorHandle::INVALID).is_none());
        assert!(arena.resolve(ActorHandle::new(0, 40)).is_none());
    }

    #[test]
    fn removing_twice_bumps_generation_once() {
        let mut arena = ActorArena::new();
        let h = arena.insert_with(dummy).unwrap();
        assert!(arena.remove(h).is_some());
        assert!(arena.remove(h).is_none());
        let next = arena.insert_with(dummy).unwrap();
        assert_eq!(next.generation(), h.generation() + 1);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn generation_skips_reserved_value() {
        assert_eq!(next_generation(0xFFFE), 0);
        assert_eq!(next_generation(7), 8);
    }

    #[test]
    fn first_free_slot_is_reused() {
        let mut arena = ActorArena::new();
        let a = arena.insert_with(dummy).unwrap();
        let _b = arena.insert_with(dummy).unwrap();
        arena.remove(a);
        let c = arena.insert_with(dummy).unwrap();
        assert_eq!(c.index(), 0);
        assert_eq!(arena.capacity(), 2);
        assert_eq!(arena.handles().len(), 2);
    }
}
