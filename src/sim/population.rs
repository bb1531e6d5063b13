//! Live shape collection
//!
//! Owns every shape and the RNG used to generate them. Iteration order is
//! spawn order; the last shape is drawn on top and wins hit-tests.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::ShapeKind;
use super::shape::{Shape, ShapeId, clamp_x};
use crate::Canvas;
use crate::consts::*;
use crate::settings::SimulationConfig;

/// Visible-set statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub total_area: f64,
}

impl Stats {
    /// Area readout with two decimals
    pub fn area_label(&self) -> String {
        format!("{:.2}", self.total_area)
    }
}

/// Ordered collection of live shapes
#[derive(Debug, Clone)]
pub struct Population {
    shapes: Vec<Shape>,
    rng: Pcg32,
    next_id: u32,
}

impl Population {
    pub fn new(seed: u64) -> Self {
        Self {
            shapes: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn next_shape_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a random shape just above the top edge at a random x
    pub fn spawn_random(&mut self, config: &SimulationConfig, canvas: Canvas) -> ShapeId {
        let size = self.random_size();
        let x = self.rng.random::<f32>() * canvas.width;
        let y = -size - SPAWN_MARGIN;
        self.insert(Vec2::new(x, y), size, config, canvas)
    }

    /// Spawn a random shape at a caller-chosen point (x is clamped)
    pub fn spawn_at(&mut self, pos: Vec2, config: &SimulationConfig, canvas: Canvas) -> ShapeId {
        let size = self.random_size();
        self.insert(pos, size, config, canvas)
    }

    fn random_size(&mut self) -> f32 {
        self.rng.random_range(MIN_SHAPE_SIZE..MAX_SHAPE_SIZE)
    }

    fn insert(&mut self, pos: Vec2, size: f32, config: &SimulationConfig, canvas: Canvas) -> ShapeId {
        let id = self.next_shape_id();
        let kind = ShapeKind::random(&mut self.rng);
        let color = self.rng.random_range(0..COLOR_RANGE);
        let pos = Vec2::new(clamp_x(pos.x, size, canvas.width), pos.y);
        let shape = Shape::new(id, pos, kind, color, size, config.gravity(), &mut self.rng);
        log::debug!(
            "Spawned {} #{} size {:.1} at ({:.1}, {:.1})",
            kind.as_str(),
            id.0,
            size,
            pos.x,
            pos.y
        );
        self.shapes.push(shape);
        id
    }

    /// Advance every shape one frame, then drop those that left the bottom.
    /// Returns the dropped shapes so the caller can release each exactly once.
    pub fn advance_all(&mut self, canvas_height: f32) -> Vec<Shape> {
        for shape in &mut self.shapes {
            shape.advance();
        }

        let mut exited = Vec::new();
        let mut kept = Vec::with_capacity(self.shapes.len());
        for shape in self.shapes.drain(..) {
            if shape.is_below_canvas(canvas_height) {
                exited.push(shape);
            } else {
                kept.push(shape);
            }
        }
        self.shapes = kept;
        exited
    }

    /// Remove a shape by id. Returns `None` if it is already gone.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let idx = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(idx))
    }

    /// Apply a new gravity to every live shape
    pub fn broadcast_gravity(&mut self, gravity: f32) {
        for shape in &mut self.shapes {
            shape.vy = gravity;
        }
    }

    /// Count and total area of shapes at least partially inside the canvas rows
    pub fn visible_stats(&self, canvas_height: f32) -> Stats {
        self.shapes
            .iter()
            .filter(|s| s.is_visible(canvas_height))
            .fold(Stats::default(), |acc, s| Stats {
                count: acc.count + 1,
                total_area: acc.total_area + s.area(),
            })
    }

    /// Topmost shape under a canvas point
    pub fn hit_test(&self, point: Vec2) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.contains(point))
            .map(|s| s.id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
