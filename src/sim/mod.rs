//! Shape simulation module
//!
//! All shape lifecycle logic lives here:
//! - Geometry and area per shape kind
//! - Falling entities and the population that owns them
//! - The director that schedules spawning and frame ticks
//! - No rendering or platform dependencies

pub mod director;
pub mod geometry;
pub mod population;
pub mod schedule;
pub mod shape;

pub use director::{Cooldown, Director, DirectorPhase, RemovalCause, ShapeEvent};
pub use geometry::{Geometry, ShapeKind, shoelace_area};
pub use population::{Population, Stats};
pub use schedule::{Cadence, FrameScheduler, Scheduler, Task, TimerId};
pub use shape::{Shape, ShapeId, clamp_x};
