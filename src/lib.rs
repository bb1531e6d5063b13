//! Falling Shapes - gravity-driven shape toy for the browser canvas
//!
//! Core modules:
//! - `sim`: Shape lifecycle (geometry, entities, population, director, scheduling)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted simulation config (gravity, spawn rate)

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::SimulationConfig;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Spawn trigger period (ms)
    pub const SPAWN_PERIOD_MS: f64 = 1000.0;
    /// Window after a pointer removal during which click/tap spawning is suppressed (ms)
    pub const REMOVAL_COOLDOWN_MS: f64 = 300.0;
    /// Maximum catch-up fires per timer per poll (stalled tabs must not burst-spawn)
    pub const MAX_CATCH_UP_FIRES: u32 = 8;

    /// Gravity defaults (pixels per frame)
    pub const DEFAULT_GRAVITY: f32 = 0.2;
    pub const MIN_GRAVITY: f32 = 0.05;
    pub const GRAVITY_STEP: f32 = 0.05;

    /// Shapes created per spawn trigger
    pub const DEFAULT_SPAWN_RATE: u32 = 1;
    pub const MIN_SPAWN_RATE: u32 = 1;

    /// Random shape size range [min, max)
    pub const MIN_SHAPE_SIZE: f32 = 20.0;
    pub const MAX_SHAPE_SIZE: f32 = 60.0;
    /// Gap above the canvas top edge for auto-spawned shapes
    pub const SPAWN_MARGIN: f32 = 10.0;
    /// Exclusive upper bound of the random 24-bit color
    pub const COLOR_RANGE: u32 = 0xFF_FFFF;

    /// Smallest usable canvas dimension (px)
    pub const MIN_CANVAS_DIM: f32 = 1.0;
}

/// Canvas bounds in pixels (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    /// Create a canvas, clamping degenerate dimensions to a usable minimum
    pub fn new(width: f32, height: f32) -> Self {
        use consts::MIN_CANVAS_DIM;
        // NaN falls through `max` to the minimum as well
        Self {
            width: width.max(MIN_CANVAS_DIM),
            height: height.max(MIN_CANVAS_DIM),
        }
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_clamps_degenerate_size() {
        let canvas = Canvas::new(0.0, -20.0);
        assert_eq!(canvas.width, consts::MIN_CANVAS_DIM);
        assert_eq!(canvas.height, consts::MIN_CANVAS_DIM);

        let canvas = Canvas::new(f32::NAN, 480.0);
        assert_eq!(canvas.width, consts::MIN_CANVAS_DIM);
        assert_eq!(canvas.height, 480.0);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 10.0).abs() < 1e-5);
    }
}
