//! Shape tessellation for 2D primitives
//!
//! Output is a triangle list in canvas pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Geometry, Population, Shape};

/// Segments used for circles and ellipses
const CURVE_SEGMENTS: u32 = 48;

/// Triangle fan from `center` over a closed outline
fn fan(center: Vec2, outline: impl Iterator<Item = Vec2> + Clone, color: [f32; 4], out: &mut Vec<Vertex>) {
    let next = outline.clone().cycle().skip(1);
    for (p1, p2) in outline.zip(next) {
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(center.x + p1.x, center.y + p1.y, color));
        out.push(Vertex::new(center.x + p2.x, center.y + p2.y, color));
    }
}

/// Generate vertices for one shape.
/// Every outline is star-shaped around the shape center, so a fan covers it.
pub fn shape(shape: &Shape, out: &mut Vec<Vertex>) {
    let color = colors::from_rgb(shape.color);
    match shape.geometry() {
        Geometry::Polygon(verts) => fan(shape.pos, verts.iter().copied(), color, out),
        Geometry::Circle { radius } => ellipse(shape.pos, *radius, *radius, color, out),
        Geometry::Ellipse { rx, ry } => ellipse(shape.pos, *rx, *ry, color, out),
    }
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, rx: f32, ry: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let outline = (0..CURVE_SEGMENTS).map(move |i| {
        let theta = (i as f32 / CURVE_SEGMENTS as f32) * 2.0 * PI;
        Vec2::new(rx * theta.cos(), ry * theta.sin())
    });
    fan(center, outline, color, out);
}

/// Tessellate the whole population in draw order
pub fn population(population: &Population) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(population.len() * CURVE_SEGMENTS as usize * 3);
    for s in population.iter() {
        shape(s, &mut vertices);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ShapeId, ShapeKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn make(kind: ShapeKind) -> Shape {
        let mut rng = Pcg32::seed_from_u64(5);
        Shape::new(ShapeId(1), Vec2::new(50.0, 60.0), kind, 0xFF0000, 40.0, 0.2, &mut rng)
    }

    /// Sum of triangle areas in a triangle list
    fn covered_area(vertices: &[Vertex]) -> f32 {
        vertices
            .chunks(3)
            .map(|t| {
                let a = Vec2::from(t[0].position);
                let b = Vec2::from(t[1].position);
                let c = Vec2::from(t[2].position);
                (b - a).perp_dot(c - a).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_polygon_fan_covers_area() {
        for kind in [ShapeKind::Triangle, ShapeKind::Rectangle, ShapeKind::Hexagon, ShapeKind::Irregular] {
            let s = make(kind);
            let mut out = Vec::new();
            shape(&s, &mut out);
            let n = s.geometry().vertices().map(|v| v.len()).expect("polygonal");
            assert_eq!(out.len(), n * 3);
            assert!((covered_area(&out) - s.area() as f32).abs() < 0.05, "{:?}", kind);
        }
    }

    #[test]
    fn test_circle_tessellation() {
        let s = make(ShapeKind::Circle);
        let mut out = Vec::new();
        shape(&s, &mut out);
        assert_eq!(out.len(), CURVE_SEGMENTS as usize * 3);
        // Inscribed polygon is slightly smaller than the true disc
        let covered = covered_area(&out);
        let area = s.area() as f32;
        assert!(covered < area && covered > area * 0.99);
        assert!(out.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }
}
