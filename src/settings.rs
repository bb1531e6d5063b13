//! Simulation settings
//!
//! Gravity and spawn rate, adjustable at runtime from the control buttons.
//! Every session starts from the defaults.

use crate::consts::*;

/// Process-wide simulation knobs. Floors are enforced on every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Fall speed given to shapes (pixels per frame)
    gravity: f32,
    /// Shapes created per spawn trigger
    spawn_rate: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            spawn_rate: DEFAULT_SPAWN_RATE,
        }
    }
}

impl SimulationConfig {
    pub fn new(gravity: f32, spawn_rate: u32) -> Self {
        let mut config = Self::default();
        config.set_gravity(gravity);
        config.set_spawn_rate(spawn_rate);
        config
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn spawn_rate(&self) -> u32 {
        self.spawn_rate
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        // NaN lands on the floor
        self.gravity = gravity.max(MIN_GRAVITY);
    }

    pub fn set_spawn_rate(&mut self, rate: u32) {
        self.spawn_rate = rate.max(MIN_SPAWN_RATE);
    }

    /// Step gravity by `steps` increments of 0.05. Returns the new value.
    pub fn change_gravity(&mut self, steps: i32) -> f32 {
        self.set_gravity(self.gravity + steps as f32 * GRAVITY_STEP);
        self.gravity
    }

    /// Step the spawn rate by `delta`. Returns the new value.
    pub fn change_spawn_rate(&mut self, delta: i32) -> u32 {
        let rate = (self.spawn_rate as i64 + delta as i64).clamp(0, u32::MAX as i64);
        self.set_spawn_rate(rate as u32);
        self.spawn_rate
    }

    /// Gravity readout with two decimals
    pub fn gravity_label(&self) -> String {
        format!("{:.2}", self.gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.spawn_rate(), 1);
        assert!((config.gravity() - 0.2).abs() < 1e-6);
        assert_eq!(config.gravity_label(), "0.20");
    }

    #[test]
    fn test_spawn_rate_floor() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.change_spawn_rate(-1), 1);
        assert_eq!(config.change_spawn_rate(-5), 1);
        assert_eq!(config.change_spawn_rate(2), 3);
        assert_eq!(config.change_spawn_rate(-1), 2);
    }

    #[test]
    fn test_gravity_floor() {
        let mut config = SimulationConfig::default();
        for _ in 0..10 {
            config.change_gravity(-1);
        }
        assert!((config.gravity() - MIN_GRAVITY).abs() < 1e-6);
        assert!(config.gravity() >= MIN_GRAVITY);
        config.change_gravity(1);
        assert!((config.gravity() - 0.1).abs() < 1e-5);
        assert_eq!(config.gravity_label(), "0.10");
    }

    #[test]
    fn test_new_clamps() {
        let config = SimulationConfig::new(-3.0, 0);
        assert_eq!(config.gravity(), MIN_GRAVITY);
        assert_eq!(config.spawn_rate(), MIN_SPAWN_RATE);

        let config = SimulationConfig::new(f32::NAN, 4);
        assert_eq!(config.gravity(), MIN_GRAVITY);
        assert_eq!(config.spawn_rate(), 4);
    }
}
