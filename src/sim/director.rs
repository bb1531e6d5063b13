//! Animation director
//!
//! Drives the population from two repeating tasks (spawn trigger and frame
//! tick), routes pointer input, and keeps the stats readout current.
//!
//! Pointer events bubble: a press on a shape reaches the shape first and the
//! canvas afterwards. Removing a shape opens a short cooldown so the same
//! gesture does not spawn a replacement where the shape used to be.

use glam::Vec2;

use super::population::{Population, Stats};
use super::schedule::{Cadence, FrameScheduler, Scheduler, Task, TimerId};
use super::shape::ShapeId;
use crate::Canvas;
use crate::consts::*;
use crate::settings::SimulationConfig;

/// Director lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorPhase {
    /// Not started, or shut down
    Idle,
    /// Spawning and animating
    Running,
}

/// Why a shape left the population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalCause {
    /// Fell past the bottom edge
    ExitedCanvas,
    /// Pressed by the user
    Pointer,
}

/// Lifecycle notifications for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeEvent {
    Spawned(ShapeId),
    Removed { id: ShapeId, cause: RemovalCause },
}

/// Click/tap suppression window after a pointer removal.
/// A removal during an active window restarts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldown {
    until: Option<f64>,
}

impl Cooldown {
    pub fn engage(&mut self, now: f64) {
        self.until = Some(now + REMOVAL_COOLDOWN_MS);
    }

    pub fn is_active(&self, now: f64) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

/// Orchestrates spawning, animation, input and stats
pub struct Director<S: Scheduler = FrameScheduler> {
    config: SimulationConfig,
    population: Population,
    canvas: Canvas,
    scheduler: S,
    phase: DirectorPhase,
    spawn_timer: Option<TimerId>,
    frame_timer: Option<TimerId>,
    cooldown: Cooldown,
    stats: Stats,
    events: Vec<ShapeEvent>,
}

impl Director<FrameScheduler> {
    pub fn new(config: SimulationConfig, canvas: Canvas, seed: u64) -> Self {
        Self::with_scheduler(config, canvas, seed, FrameScheduler::new())
    }
}

impl<S: Scheduler> Director<S> {
    pub fn with_scheduler(config: SimulationConfig, canvas: Canvas, seed: u64, scheduler: S) -> Self {
        Self {
            config,
            population: Population::new(seed),
            canvas,
            scheduler,
            phase: DirectorPhase::Idle,
            spawn_timer: None,
            frame_timer: None,
            cooldown: Cooldown::default(),
            stats: Stats::default(),
            events: Vec::new(),
        }
    }

    /// Start the spawn trigger and the frame tick
    pub fn start(&mut self, now: f64) {
        if self.phase == DirectorPhase::Running {
            return;
        }
        self.restart_spawn_timer(now);
        self.frame_timer = Some(
            self.scheduler
                .schedule_repeating(Cadence::EveryFrame, Task::Frame, now),
        );
        self.phase = DirectorPhase::Running;
        log::info!(
            "Director started: rate={}, gravity={}",
            self.config.spawn_rate(),
            self.config.gravity_label()
        );
    }

    /// Cancel both timers
    pub fn shutdown(&mut self) {
        for id in [self.spawn_timer.take(), self.frame_timer.take()].into_iter().flatten() {
            self.scheduler.cancel(id);
        }
        self.phase = DirectorPhase::Idle;
        log::info!("Director stopped");
    }

    /// Cancel the current spawn trigger, then schedule a fresh one
    fn restart_spawn_timer(&mut self, now: f64) {
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.cancel(id);
        }
        self.spawn_timer = Some(self.scheduler.schedule_repeating(
            Cadence::Every(SPAWN_PERIOD_MS),
            Task::Spawn,
            now,
        ));
    }

    /// Run every task that is due at `now`
    pub fn pump(&mut self, now: f64) {
        for task in self.scheduler.due(now) {
            match task {
                Task::Spawn => self.spawn_tick(),
                Task::Frame => self.frame_tick(),
            }
        }
    }

    /// Spawn trigger body: `spawn_rate` random shapes
    pub fn spawn_tick(&mut self) {
        for _ in 0..self.config.spawn_rate() {
            let id = self.population.spawn_random(&self.config, self.canvas);
            self.events.push(ShapeEvent::Spawned(id));
        }
        self.refresh_stats();
    }

    /// Frame tick body: fall, prune, refresh stats
    pub fn frame_tick(&mut self) {
        let exited = self.population.advance_all(self.canvas.height);
        for shape in exited {
            self.events.push(ShapeEvent::Removed {
                id: shape.id,
                cause: RemovalCause::ExitedCanvas,
            });
        }
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats = self.population.visible_stats(self.canvas.height);
    }

    /// Pointer pressed on the canvas. Removes the topmost shape under it, if any.
    pub fn pointer_down(&mut self, point: Vec2, now: f64) -> Option<ShapeId> {
        let id = self.population.hit_test(point)?;
        self.remove_by_pointer(id, now);
        Some(id)
    }

    /// Removal reported by a pressed shape. Safe to call for shapes that are already gone;
    /// the cooldown is engaged either way.
    pub fn remove_by_pointer(&mut self, id: ShapeId, now: f64) -> bool {
        self.cooldown.engage(now);
        match self.population.remove(id) {
            Some(shape) => {
                log::debug!("Removed {} #{} by pointer", shape.kind.as_str(), id.0);
                self.events.push(ShapeEvent::Removed {
                    id,
                    cause: RemovalCause::Pointer,
                });
                self.refresh_stats();
                true
            }
            None => false,
        }
    }

    /// Mouse click on the canvas background
    pub fn canvas_click(&mut self, point: Vec2, now: f64) -> Option<ShapeId> {
        self.spawn_at(point, now)
    }

    /// Touch start on the canvas. Multi-touch gestures are ignored.
    pub fn canvas_touch(&mut self, touches: &[Vec2], now: f64) -> Option<ShapeId> {
        match touches {
            [point] => self.spawn_at(*point, now),
            _ => None,
        }
    }

    /// Spawn at a point unless a removal cooldown is active
    pub fn spawn_at(&mut self, point: Vec2, now: f64) -> Option<ShapeId> {
        if self.cooldown.is_active(now) {
            log::debug!("Spawn at ({:.0}, {:.0}) suppressed by cooldown", point.x, point.y);
            return None;
        }
        let id = self.population.spawn_at(point, &self.config, self.canvas);
        self.events.push(ShapeEvent::Spawned(id));
        self.refresh_stats();
        Some(id)
    }

    /// Rate control: step the spawn rate and restart the trigger
    pub fn change_spawn_rate(&mut self, delta: i32, now: f64) -> u32 {
        let rate = self.config.change_spawn_rate(delta);
        if self.phase == DirectorPhase::Running {
            self.restart_spawn_timer(now);
        }
        log::info!("Spawn rate: {}", rate);
        rate
    }

    /// Gravity control: step gravity and apply it to every live shape
    pub fn change_gravity(&mut self, steps: i32) -> f32 {
        let gravity = self.config.change_gravity(steps);
        self.population.broadcast_gravity(gravity);
        log::info!("Gravity: {}", self.config.gravity_label());
        gravity
    }

    /// Canvas resized. Existing shapes keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Canvas::new(width, height);
        self.refresh_stats();
    }

    /// Take pending lifecycle events
    pub fn drain_events(&mut self) -> Vec<ShapeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn cooldown_active(&self, now: f64) -> bool {
        self.cooldown.is_active(now)
    }
}
