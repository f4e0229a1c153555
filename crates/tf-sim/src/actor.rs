//! Actor records and their per-actor behaviour.

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use tf_core::{Cylinder, EulerAngles, turn_toward_degrees};

use crate::ai::AiController;
use crate::controller::Controller;
use crate::definition::{ActorDefinition, Faction};
use crate::handle::ActorHandle;
use crate::weapon::Weapon;

/// Lifecycle state of an actor.
///
/// `Dying` only ever leads to `Dead`, and `Dead` is terminal: the actor's
/// slot is reclaimed on the next lifecycle pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    /// Default state: moving or idle.
    Walking,
    /// Playing an attack.
    Attacking,
    /// Flinching after damage.
    Hurting,
    /// Health ran out; the corpse lingers.
    Dying,
    /// Ready for removal.
    Dead,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Walking => "walking",
            Self::Attacking => "attacking",
            Self::Hurting => "hurting",
            Self::Dying => "dying",
            Self::Dead => "dead",
        };
        f.write_str(name)
    }
}

/// A state change, old then new.
pub type StateChange = (ActorState, ActorState);

/// A simulated actor.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The handle this actor was issued.
    pub handle: ActorHandle,
    /// Static parameters.
    pub definition: Arc<ActorDefinition>,
    /// Side the actor fights for. Projectiles take their shooter's.
    pub faction: Faction,
    /// Center of the collision cylinder's base.
    pub position: Vec3,
    /// Facing.
    pub orientation: EulerAngles,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Forces accumulated since the last physics step.
    pub acceleration: Vec3,
    /// Remaining hit points. Below one the actor starts dying.
    pub health: f32,
    /// Standing on the floor, so drag applies and gravity does not.
    pub grounded: bool,
    /// The actor that fired this one.
    pub owner: Option<ActorHandle>,
    /// Inventory.
    pub weapons: Vec<Weapon>,
    /// Index of the equipped weapon.
    pub equipped: usize,
    /// Who is driving this actor.
    pub controller: Controller,
    /// The actor's own AI, used whenever no player possesses it.
    pub ai: Option<AiController>,
    state: ActorState,
    state_started: f64,
    spawned_at: f64,
}

impl Actor {
    /// Create an actor at `position`, spawned at simulated time `now`.
    pub fn new(
        handle: ActorHandle,
        definition: Arc<ActorDefinition>,
        weapons: Vec<Weapon>,
        position: Vec3,
        orientation: EulerAngles,
        now: f64,
    ) -> Self {
        let state = if definition.die_on_spawn {
            ActorState::Dying
        } else {
            ActorState::Walking
        };
        let ai = definition.ai_enabled.then(AiController::default);
        Self {
            handle,
            faction: definition.faction,
            health: definition.health,
            grounded: !definition.gravity || position.z <= 0.0,
            controller: if ai.is_some() { Controller::Ai } else { Controller::None },
            ai,
            definition,
            position,
            orientation,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            owner: None,
            weapons,
            equipped: 0,
            state,
            state_started: now,
            spawned_at: now,
        }
    }

    /// Definition name, e.g. `Marine`.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Neither dying nor dead.
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, ActorState::Dying | ActorState::Dead)
    }

    /// Whether this actor was fired by a weapon.
    pub fn is_projectile(&self) -> bool {
        self.definition.is_projectile
    }

    /// Whether a human player currently drives this actor.
    pub fn is_player_controlled(&self) -> bool {
        matches!(self.controller, Controller::Human { .. })
    }

    /// Change state, honouring the lifecycle ordering.
    ///
    /// Returns the change made, or `None` if the state was unchanged or
    /// the transition is not allowed.
    pub fn set_state(&mut self, state: ActorState, now: f64) -> Option<StateChange> {
        let allowed = match self.state {
            ActorState::Dead => false,
            ActorState::Dying => state == ActorState::Dead,
            _ => true,
        };
        if !allowed || state == self.state {
            return None;
        }
        let from = self.state;
        self.state = state;
        self.state_started = now;
        Some((from, state))
    }

    /// Seconds spent in the current state.
    pub fn time_in_state(&self, now: f64) -> f64 {
        now - self.state_started
    }

    /// Advance timed transitions. Returns every change made, in order.
    pub fn update_lifecycle(&mut self, now: f64) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if self.is_alive() && self.health < 1.0 {
            changes.extend(self.set_state(ActorState::Dying, now));
        }
        let spawned_at = self.spawned_at;
        if self
            .definition
            .lifetime
            .is_some_and(|lifetime| now - spawned_at >= f64::from(lifetime))
        {
            changes.extend(self.set_state(ActorState::Dead, now));
        }

        let timings = &self.definition.animations;
        let in_state = self.time_in_state(now);
        match self.state {
            ActorState::Attacking if in_state >= f64::from(timings.attack) => {
                changes.extend(self.set_state(ActorState::Walking, now));
            }
            ActorState::Hurting if in_state >= f64::from(timings.hurt) => {
                changes.extend(self.set_state(ActorState::Walking, now));
            }
            ActorState::Dying => {
                let linger = timings.death.max(self.definition.corpse_lifetime);
                if in_state >= f64::from(linger) {
                    changes.extend(self.set_state(ActorState::Dead, now));
                }
            }
            _ => {}
        }
        changes
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// The collision cylinder at the current position.
    pub fn cylinder(&self) -> Cylinder {
        Cylinder::new(self.position, self.definition.radius, self.definition.height)
    }

    /// Where sight and hit-scan rays start.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Z * self.definition.eye_height
    }

    /// Unit facing vector including pitch.
    pub fn forward(&self) -> Vec3 {
        self.orientation.forward()
    }

    /// Facing projected onto the ground plane.
    pub fn forward_xy(&self) -> Vec2 {
        self.orientation.forward_xy()
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Accumulate a force for the next physics step.
    pub fn add_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Change velocity immediately.
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    /// Drive horizontally at the given velocity, cancelling out ground drag.
    pub fn move_in_direction(&mut self, velocity: Vec2) {
        self.velocity.x = velocity.x;
        self.velocity.y = velocity.y;
        let drag = self.velocity.truncate().extend(0.0) * self.definition.drag;
        self.add_force(drag);
    }

    /// Turn toward a yaw by at most `max_degrees`.
    pub fn turn_toward(&mut self, goal_yaw: f32, max_degrees: f32) {
        self.orientation.yaw = turn_toward_degrees(self.orientation.yaw, goal_yaw, max_degrees);
    }

    /// Leap upward if standing on the floor.
    pub fn jump(&mut self) -> bool {
        if !self.grounded || self.definition.jump_impulse <= 0.0 {
            return false;
        }
        self.velocity.z += self.definition.jump_impulse;
        self.grounded = false;
        true
    }

    /// One semi-implicit Euler step.
    ///
    /// Drag acts only on the ground and gravity only in the air.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if !self.is_alive() {
            return;
        }
        let drag = if self.grounded { self.definition.drag } else { 0.0 };
        self.add_force(-self.velocity * drag);
        if !self.grounded && self.definition.gravity {
            self.add_force(Vec3::NEG_Z * gravity);
        }
        self.position += self.velocity * dt;
        self.velocity += self.acceleration * dt;
        self.acceleration = Vec3::ZERO;
    }

    // -----------------------------------------------------------------------
    // Inventory
    // -----------------------------------------------------------------------

    /// The weapon currently in hand.
    pub fn equipped_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.equipped)
    }

    /// Equip by inventory index. Returns `false` if there is no such weapon.
    pub fn equip(&mut self, index: usize) -> bool {
        if index < self.weapons.len() {
            self.equipped = index;
            true
        } else {
            false
        }
    }

    /// Equip the next weapon, wrapping around.
    pub fn equip_next(&mut self) {
        if !self.weapons.is_empty() {
            self.equipped = (self.equipped + 1) % self.weapons.len();
        }
    }

    /// Equip the previous weapon, wrapping around.
    pub fn equip_previous(&mut self) {
        if !self.weapons.is_empty() {
            self.equipped = (self.equipped + self.weapons.len() - 1) % self.weapons.len();
        }
    }
}
