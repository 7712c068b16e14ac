//! Shapes behind the feature columns.
//!
//! The rectangle features are the three spans of a box; the triangle
//! features are vertex coordinates in `x1, x2, x3, y1, y2, y3` order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which shape a feature vector describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// `[x_span, y_span, z_span]`.
    Box,
    /// `[x1, x2, x3, y1, y2, y3]`.
    Triangle,
}

impl Geometry {
    /// Derived quantities of the shape, or `None` if `features` has the wrong
    /// length for it.
    pub fn describe(self, features: &[f64]) -> Option<ShapeSummary> {
        match self {
            Geometry::Box => BoxSpans::from_features(features).map(ShapeSummary::Box),
            Geometry::Triangle => Triangle::from_features(features).map(ShapeSummary::Triangle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpans {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BoxSpans {
    pub fn from_features(features: &[f64]) -> Option<Self> {
        match *features {
            [x, y, z] => Some(BoxSpans { x, y, z }),
            _ => None,
        }
    }

    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [(f64, f64); 3],
}

impl Triangle {
    pub fn new(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        Triangle {
            vertices: [a, b, c],
        }
    }

    pub fn from_features(features: &[f64]) -> Option<Self> {
        match *features {
            [x1, x2, x3, y1, y2, y3] => Some(Triangle::new((x1, y1), (x2, y2), (x3, y3))),
            _ => None,
        }
    }

    /// Unsigned area (shoelace formula).
    pub fn area(&self) -> f64 {
        let [(x1, y1), (x2, y2), (x3, y3)] = self.vertices;
        0.5 * (x1 * (y2 - y3) + x2 * (y3 - y1) + x3 * (y1 - y2)).abs()
    }

    pub fn centroid(&self) -> (f64, f64) {
        let [(x1, y1), (x2, y2), (x3, y3)] = self.vertices;
        ((x1 + x2 + x3) / 3.0, (y1 + y2 + y3) / 3.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSummary {
    Box(BoxSpans),
    Triangle(Triangle),
}

impl fmt::Display for ShapeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::report::sci;
        match self {
            ShapeSummary::Box(b) => write!(f, "Box volume: {}", sci(b.volume())),
            ShapeSummary::Triangle(t) => {
                let (cx, cy) = t.centroid();
                write!(
                    f,
                    "Triangle area: {}, centroid: ({}, {})",
                    sci(t.area()),
                    sci(cx),
                    sci(cy)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn triangle_area_and_centroid() {
        // Default triangle of the interactive triangle page.
        let t = Triangle::new((-0.25, 0.0), (0.25, 0.0), (0.0, 0.36));
        assert_relative_eq!(t.area(), 0.09, epsilon = 1e-12);
        let (cx, cy) = t.centroid();
        assert_relative_eq!(cx, 0.0, epsilon = 1e-12);
        assert_relative_eq!(cy, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn area_ignores_vertex_order() {
        let a = Triangle::new((0.0, 0.0), (4.0, 0.0), (0.0, 3.0));
        let b = Triangle::new((0.0, 3.0), (4.0, 0.0), (0.0, 0.0));
        assert_eq!(a.area(), 6.0);
        assert_eq!(b.area(), 6.0);
    }

    #[test]
    fn features_follow_column_order() {
        let t = Triangle::from_features(&[0.0, 4.0, 0.0, 0.0, 0.0, 3.0]).unwrap();
        assert_eq!(t.vertices, [(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        assert!(Triangle::from_features(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn describe_checks_length() {
        let summary = Geometry::Box.describe(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(summary.to_string(), "Box volume: 6.000000e+00");
        assert!(Geometry::Box.describe(&[1.0, 2.0]).is_none());
        assert!(Geometry::Triangle.describe(&[1.0, 2.0, 3.0]).is_none());
    }
}
