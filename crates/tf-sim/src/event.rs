use crate::actor::ActorState;
use crate::handle::ActorHandle;

/// What kind of simulation event occurred.
///
/// Renderers and audio observe these; they never feed back into the
/// simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Lifecycle
    /// An actor was placed in the world.
    Spawned {
        /// The new actor.
        actor: ActorHandle,
        /// Its definition name.
        definition: String,
    },
    /// An actor changed lifecycle state.
    StateChanged {
        /// The actor that changed.
        actor: ActorHandle,
        /// Previous state.
        from: ActorState,
        /// New state.
        to: ActorState,
    },
    /// An actor's slot was reclaimed.
    Destroyed {
        /// The retired handle.
        actor: ActorHandle,
    },

    // Combat
    /// An actor lost health.
    Damaged {
        /// The actor hurt.
        actor: ActorHandle,
        /// Who is responsible, after resolving projectile owners.
        attacker: Option<ActorHandle>,
        /// Health removed.
        amount: f32,
    },
    /// An actor's health dropped below one.
    Killed {
        /// The actor killed.
        actor: ActorHandle,
        /// Who is responsible, after resolving projectile owners.
        killer: Option<ActorHandle>,
    },
    /// An actor fired its equipped weapon.
    WeaponFired {
        /// The shooter.
        actor: ActorHandle,
        /// Weapon definition name.
        weapon: String,
    },

    // Control
    /// An AI picked a new target.
    TargetAcquired {
        /// The AI-driven actor.
        actor: ActorHandle,
        /// Its new target.
        target: ActorHandle,
    },
    /// A player took control of an actor.
    Possessed {
        /// Player index.
        player: usize,
        /// The actor now controlled.
        actor: ActorHandle,
    },
}

impl SimEventKind {
    /// Check whether a given actor is involved in this event.
    pub fn involves(&self, handle: ActorHandle) -> bool {
        match self {
            Self::Spawned { actor, .. }
            | Self::StateChanged { actor, .. }
            | Self::Destroyed { actor }
            | Self::WeaponFired { actor, .. }
            | Self::Possessed { actor, .. } => *actor == handle,
            Self::Damaged { actor, attacker, .. } => *actor == handle || *attacker == Some(handle),
            Self::Killed { actor, killer } => *actor == handle || *killer == Some(handle),
            Self::TargetAcquired { actor, target } => *actor == handle || *target == handle,
        }
    }

    /// Short label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spawned { .. } => "spawned",
            Self::StateChanged { .. } => "state",
            Self::Destroyed { .. } => "destroyed",
            Self::Damaged { .. } => "damaged",
            Self::Killed { .. } => "killed",
            Self::WeaponFired { .. } => "fired",
            Self::TargetAcquired { .. } => "target",
            Self::Possessed { .. } => "possessed",
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The frame when this event occurred.
    pub frame: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given frame, kind, and description.
    pub fn new(frame: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            frame,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred on the given frame.
    pub fn events_at_frame(&self, frame: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.frame == frame).collect()
    }

    /// Return all events involving the given actor.
    pub fn events_for_actor(&self, handle: ActorHandle) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(handle)).collect()
    }

    /// Count events whose kind has the given label.
    pub fn count(&self, label: &str) -> usize {
        self.events.iter().filter(|e| e.kind.label() == label).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
