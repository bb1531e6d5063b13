//! Falling shape entity

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Geometry, ShapeKind};

/// Stable handle for a shape within its population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// A falling shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Center in canvas pixels
    pub pos: Vec2,
    pub kind: ShapeKind,
    /// Characteristic dimension (side, diameter, circumdiameter)
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    /// Vertical speed (pixels per frame)
    pub vy: f32,
    area: f64,
    geometry: Geometry,
}

impl Shape {
    /// Create a shape. `pos.x` must already be clamped with [`clamp_x`].
    pub fn new(
        id: ShapeId,
        pos: Vec2,
        kind: ShapeKind,
        color: u32,
        size: f32,
        gravity: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let (geometry, area) = Geometry::build(kind, size, rng);
        Self {
            id,
            pos,
            kind,
            size,
            color,
            vy: gravity,
            area,
            geometry,
        }
    }

    /// Area fixed at creation
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Apply one frame of fall
    #[inline]
    pub fn advance(&mut self) {
        self.pos.y += self.vy;
    }

    /// True once the shape has fully left through the bottom edge
    #[inline]
    pub fn is_below_canvas(&self, canvas_height: f32) -> bool {
        self.pos.y - self.size > canvas_height
    }

    /// Top and bottom edges used for visibility
    #[inline]
    pub fn vertical_extent(&self) -> (f32, f32) {
        let half = self.size / 2.0;
        (self.pos.y - half, self.pos.y + half)
    }

    /// Check whether at least part of the shape overlaps the canvas rows
    pub fn is_visible(&self, canvas_height: f32) -> bool {
        let (top, bottom) = self.vertical_extent();
        bottom >= 0.0 && top <= canvas_height
    }

    /// Hit-test a canvas point against the outline
    pub fn contains(&self, point: Vec2) -> bool {
        self.geometry.contains(point - self.pos)
    }
}

/// Clamp a spawn x so the shape fits horizontally; the left bound wins on narrow canvases
#[inline]
pub fn clamp_x(x: f32, size: f32, canvas_width: f32) -> f32 {
    let half = size / 2.0;
    x.min(canvas_width - half).max(half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn shape(kind: ShapeKind, pos: Vec2, size: f32, gravity: f32) -> Shape {
        let mut rng = Pcg32::seed_from_u64(3);
        Shape::new(ShapeId(1), pos, kind, 0x336699, size, gravity, &mut rng)
    }

    #[test]
    fn test_circle_scenario() {
        let mut s = shape(ShapeKind::Circle, Vec2::new(100.0, -50.0), 40.0, 0.2);
        assert!((s.area() - 1256.64).abs() < 0.01);
        s.advance();
        assert!((s.pos.y - (-49.8)).abs() < 1e-4);
        assert_eq!(s.pos.x, 100.0);
    }

    #[test]
    fn test_clamp_x() {
        assert_eq!(clamp_x(10.0, 50.0, 200.0), 25.0);
        assert_eq!(clamp_x(190.0, 50.0, 200.0), 175.0);
        assert_eq!(clamp_x(100.0, 50.0, 200.0), 100.0);
        // Canvas narrower than the shape
        assert_eq!(clamp_x(5.0, 50.0, 30.0), 25.0);
    }

    #[test]
    fn test_rectangle_scenario() {
        let x = clamp_x(10.0, 50.0, 200.0);
        let s = shape(ShapeKind::Rectangle, Vec2::new(x, 0.0), 50.0, 0.2);
        assert_eq!(s.pos.x, 25.0);
        assert!((s.area() - 2500.0).abs() < 1e-3);
    }

    #[test]
    fn test_below_canvas() {
        let mut s = shape(ShapeKind::Triangle, Vec2::new(50.0, 539.0), 40.0, 1.0);
        assert!(!s.is_below_canvas(500.0));
        s.advance();
        assert!(!s.is_below_canvas(500.0)); // y - size == height
        s.advance();
        assert!(s.is_below_canvas(500.0));
    }

    #[test]
    fn test_visibility_edges() {
        let s = shape(ShapeKind::Circle, Vec2::new(50.0, -20.0), 40.0, 0.2);
        assert!(s.is_visible(300.0)); // bottom edge touches y = 0
        let s = shape(ShapeKind::Circle, Vec2::new(50.0, -20.5), 40.0, 0.2);
        assert!(!s.is_visible(300.0));
        let s = shape(ShapeKind::Circle, Vec2::new(50.0, 320.5), 40.0, 0.2);
        assert!(!s.is_visible(300.0));
    }

    #[test]
    fn test_contains_uses_position() {
        let s = shape(ShapeKind::Circle, Vec2::new(100.0, 100.0), 40.0, 0.2);
        assert!(s.contains(Vec2::new(110.0, 95.0)));
        assert!(!s.contains(Vec2::new(10.0, 10.0)));
    }
}
