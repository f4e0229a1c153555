use crate::error::{SimError, SimResult};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Physics sub-steps per simulated second.
    pub physics_hz: u32,
    /// Downward acceleration applied to airborne, gravity-affected actors.
    pub gravity: f32,
    /// Whether AI controllers think at all.
    pub ai_enabled: bool,
    /// Extra distance beyond touching at which an AI stops to attack.
    pub attack_tolerance: f32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            physics_hz: 240,
            gravity: 9.8,
            ai_enabled: true,
            attack_tolerance: 0.4,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the physics sub-step rate.
    pub fn with_physics_hz(mut self, hz: u32) -> Self {
        self.physics_hz = hz;
        self
    }

    /// Set the downward acceleration.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Enable or disable AI controllers.
    pub fn with_ai(mut self, enabled: bool) -> Self {
        self.ai_enabled = enabled;
        self
    }

    /// Set the extra reach at which an AI stops to attack.
    pub fn with_attack_tolerance(mut self, tolerance: f32) -> Self {
        self.attack_tolerance = tolerance;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if self.physics_hz == 0 {
            return Err(SimError::InvalidConfig("physics_hz must be positive".into()));
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "gravity must be a non-negative number, got {}",
                self.gravity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.physics_hz, 240);
        assert!(config.ai_enabled);
        assert!((config.attack_tolerance - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.max_events, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = SimConfig::default()
            .with_seed(123)
            .with_physics_hz(120)
            .with_gravity(0.0)
            .with_ai(false)
            .with_max_events(500);
        assert_eq!(config.seed, 123);
        assert_eq!(config.physics_hz, 120);
        assert!(!config.ai_enabled);
        assert_eq!(config.max_events, 500);
    }

    #[test]
    fn config_rejects_zero_rate_and_bad_gravity() {
        assert!(SimConfig::default().with_physics_hz(0).validate().is_err());
        assert!(SimConfig::default().with_gravity(-1.0).validate().is_err());
        assert!(SimConfig::default().with_gravity(f32::NAN).validate().is_err());
    }
}
