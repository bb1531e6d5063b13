//! Procedural shape geometry
//!
//! Every shape is described in local coordinates centered on its position.
//! Polygonal kinds are realized as a vertex list; circles and ellipses keep
//! their radii. Area is derived once from the realized outline and kept in
//! `f64` so readout totals stay exact to the hundredth.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::polar_to_cartesian;

/// Shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Triangle,
    Rectangle,
    Pentagon,
    Hexagon,
    Circle,
    Ellipse,
    Star,
    Irregular,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Triangle,
        ShapeKind::Rectangle,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Star,
        ShapeKind::Irregular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Star => "star",
            ShapeKind::Irregular => "irregular",
        }
    }

    /// Pick a kind uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Star proportions
const STAR_POINTS: usize = 5;
/// Area factor applied to the squared outer radius of the star
const STAR_AREA_FACTOR: f64 = 2.5;
/// Ellipse minor/major axis ratio
const ELLIPSE_RATIO: f32 = 0.6;
/// Irregular polygons have 3..=7 vertices
const IRREGULAR_MIN_VERTICES: usize = 3;
const IRREGULAR_EXTRA_VERTICES: usize = 5;

/// Realized outline of a shape, in local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Closed polygon, vertices in drawing order
    Polygon(Vec<Vec2>),
    Circle { radius: f32 },
    Ellipse { rx: f32, ry: f32 },
}

impl Geometry {
    /// Build the outline and its area for a kind at the given size
    pub fn build(kind: ShapeKind, size: f32, rng: &mut impl Rng) -> (Self, f64) {
        let half = size / 2.0;
        let (s, h) = (f64::from(size), f64::from(half));
        match kind {
            ShapeKind::Triangle => {
                let verts = vec![
                    Vec2::new(-half, half),
                    Vec2::new(half, half),
                    Vec2::new(0.0, -half),
                ];
                (Geometry::Polygon(verts), s * s / 2.0)
            }
            ShapeKind::Rectangle => {
                let verts = vec![
                    Vec2::new(-half, -half),
                    Vec2::new(half, -half),
                    Vec2::new(half, half),
                    Vec2::new(-half, half),
                ];
                (Geometry::Polygon(verts), s * s)
            }
            ShapeKind::Pentagon => regular_polygon(5, half),
            ShapeKind::Hexagon => regular_polygon(6, half),
            ShapeKind::Circle => {
                let area = std::f64::consts::PI * h * h;
                (Geometry::Circle { radius: half }, area)
            }
            ShapeKind::Ellipse => {
                let (rx, ry) = (half, half * ELLIPSE_RATIO);
                let area = std::f64::consts::PI * h * h * f64::from(ELLIPSE_RATIO);
                (Geometry::Ellipse { rx, ry }, area)
            }
            ShapeKind::Star => {
                let (outer, inner) = (half, size / 4.0);
                let verts = (0..STAR_POINTS * 2)
                    .map(|i| {
                        let r = if i % 2 == 0 { outer } else { inner };
                        polar_to_cartesian(r, i as f32 * PI / STAR_POINTS as f32)
                    })
                    .collect();
                (Geometry::Polygon(verts), STAR_AREA_FACTOR * h * h)
            }
            ShapeKind::Irregular => {
                let count = IRREGULAR_MIN_VERTICES + rng.random_range(0..IRREGULAR_EXTRA_VERTICES);
                let step = TAU / count as f32;
                let verts: Vec<Vec2> = (0..count)
                    .map(|i| {
                        // Radius in [size/4, 3*size/4)
                        let r = rng.random::<f32>() * half + size / 4.0;
                        polar_to_cartesian(r, i as f32 * step)
                    })
                    .collect();
                let area = shoelace_area(&verts);
                (Geometry::Polygon(verts), area)
            }
        }
    }

    /// Polygon vertices, if this outline is polygonal
    pub fn vertices(&self) -> Option<&[Vec2]> {
        match self {
            Geometry::Polygon(verts) => Some(verts),
            _ => None,
        }
    }

    /// Check if a point in local coordinates lies inside the outline
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Geometry::Polygon(verts) => polygon_contains(verts, p),
            Geometry::Circle { radius } => p.length_squared() <= radius * radius,
            Geometry::Ellipse { rx, ry } => {
                let (nx, ny) = (p.x / rx, p.y / ry);
                nx * nx + ny * ny <= 1.0
            }
        }
    }
}

/// Regular n-gon inscribed in a circle of radius `r`, first vertex at angle 0
fn regular_polygon(sides: usize, r: f32) -> (Geometry, f64) {
    let step = TAU / sides as f32;
    let verts = (0..sides)
        .map(|i| polar_to_cartesian(r, i as f32 * step))
        .collect();
    let r = f64::from(r);
    let area = sides as f64 * r * r * (std::f64::consts::TAU / sides as f64).sin() / 2.0;
    (Geometry::Polygon(verts), area)
}

/// Polygon area by the shoelace formula (absolute value, any winding)
pub fn shoelace_area(verts: &[Vec2]) -> f64 {
    let n = verts.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = verts[i].as_dvec2();
            let b = verts[(i + 1) % n].as_dvec2();
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Even-odd point-in-polygon test
fn polygon_contains(verts: &[Vec2], p: Vec2) -> bool {
    let n = verts.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (verts[i], verts[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EPS: f32 = 1e-3;

    fn area_of(kind: ShapeKind, size: f64) -> f64 {
        let mut rng = Pcg32::seed_from_u64(7);
        Geometry::build(kind, size as f32, &mut rng).1
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_closed_form_areas() {
        use std::f64::consts::{PI, TAU};

        let size = 40.0_f64;
        let r = size / 2.0;
        assert!(approx(area_of(ShapeKind::Triangle, size), size * size / 2.0));
        assert!(approx(area_of(ShapeKind::Rectangle, size), size * size));
        assert!(approx(
            area_of(ShapeKind::Pentagon, size),
            5.0 * r * r * (TAU / 5.0).sin() / 2.0
        ));
        assert!(approx(
            area_of(ShapeKind::Hexagon, size),
            6.0 * r * r * (TAU / 6.0).sin() / 2.0
        ));
        assert!(approx(area_of(ShapeKind::Circle, size), PI * r * r));
        assert!(approx(area_of(ShapeKind::Ellipse, size), PI * r * r * 0.6));
        assert!(approx(area_of(ShapeKind::Star, size), 2.5 * r * r));
    }

    #[test]
    fn test_regular_polygon_area_matches_vertices() {
        let mut rng = Pcg32::seed_from_u64(1);
        for kind in [ShapeKind::Pentagon, ShapeKind::Hexagon, ShapeKind::Triangle, ShapeKind::Rectangle] {
            let (geom, area) = Geometry::build(kind, 33.0, &mut rng);
            let verts = geom.vertices().expect("polygonal kind");
            assert!(approx(shoelace_area(verts), area), "{:?}", kind);
        }
    }

    #[test]
    fn test_star_outline() {
        let mut rng = Pcg32::seed_from_u64(1);
        let (geom, _) = Geometry::build(ShapeKind::Star, 40.0, &mut rng);
        let verts = geom.vertices().expect("star is polygonal");
        assert_eq!(verts.len(), 10);
        assert!((verts[0].length() - 20.0).abs() < EPS);
        assert!((verts[1].length() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_contains() {
        let circle = Geometry::Circle { radius: 10.0 };
        assert!(circle.contains(Vec2::new(6.0, 6.0)));
        assert!(!circle.contains(Vec2::new(8.0, 8.0)));

        let ellipse = Geometry::Ellipse { rx: 20.0, ry: 12.0 };
        assert!(ellipse.contains(Vec2::new(18.0, 0.0)));
        assert!(!ellipse.contains(Vec2::new(0.0, 15.0)));

        let mut rng = Pcg32::seed_from_u64(1);
        let (square, _) = Geometry::build(ShapeKind::Rectangle, 20.0, &mut rng);
        assert!(square.contains(Vec2::ZERO));
        assert!(square.contains(Vec2::new(9.0, -9.0)));
        assert!(!square.contains(Vec2::new(11.0, 0.0)));

        // Star notch between two outer points is outside
        let (star, _) = Geometry::build(ShapeKind::Star, 40.0, &mut rng);
        assert!(star.contains(Vec2::ZERO));
        assert!(!star.contains(polar_to_cartesian(15.0, PI / 5.0)));
    }

    proptest! {
        #[test]
        fn prop_area_positive(kind_idx in 0usize..8, size in 0.5f32..500.0, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (_, area) = Geometry::build(ShapeKind::ALL[kind_idx], size, &mut rng);
            prop_assert!(area > 0.0);
        }

        #[test]
        fn prop_irregular_area_is_shoelace(size in 1.0f32..200.0, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (geom, area) = Geometry::build(ShapeKind::Irregular, size, &mut rng);
            let verts = geom.vertices().expect("irregular is polygonal");
            prop_assert!((3..=7).contains(&verts.len()));
            for v in verts {
                let r = v.length();
                prop_assert!(r >= size / 4.0 - 1e-3 && r <= 3.0 * size / 4.0 + 1e-3);
            }
            prop_assert!((shoelace_area(verts) - area).abs() <= 1e-4 * area.max(1.0));
        }
    }
}
