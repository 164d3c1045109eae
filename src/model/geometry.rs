//! Core geometry types in image coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Return this point shifted by `delta`.
    pub fn translated(&self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Even-odd point-in-polygon test (ray casting).
///
/// The polygon is closed implicitly from the last vertex back to the first.
/// Self-intersecting outlines follow the even-odd rule. Fewer than three
/// vertices never contain anything.
pub fn polygon_contains(vertices: &[Point], point: &Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = &vertices[i];
        let vj = &vertices[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_inside_outside() {
        let poly = square();
        assert!(polygon_contains(&poly, &Point::new(5.0, 5.0)));
        assert!(!polygon_contains(&poly, &Point::new(15.0, 5.0)));
        assert!(!polygon_contains(&poly, &Point::new(-1.0, 5.0)));
    }

    #[test]
    fn test_boundary_is_deterministic() {
        let poly = square();
        let edge = Point::new(10.0, 5.0);
        let first = polygon_contains(&poly, &edge);
        for _ in 0..10 {
            assert_eq!(polygon_contains(&poly, &edge), first);
        }
        // Right edge falls outside under the half-open crossing rule.
        assert!(!first);
        // Left edge falls inside.
        assert!(polygon_contains(&poly, &Point::new(0.0, 5.0)));
    }

    #[test]
    fn test_self_intersecting_bowtie() {
        // Bow-tie: two triangles meeting at (5, 5).
        let bowtie = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(polygon_contains(&bowtie, &Point::new(1.0, 5.0)));
        assert!(polygon_contains(&bowtie, &Point::new(9.0, 5.0)));
        assert!(!polygon_contains(&bowtie, &Point::new(5.0, 1.0)));
        assert!(!polygon_contains(&bowtie, &Point::new(5.0, 9.0)));
    }

    #[test]
    fn test_overlapping_winding_even_odd() {
        // Pentagram: the inner pentagon is wound twice, so even-odd
        // reports it as outside.
        let star: Vec<Point> = (0..5)
            .map(|k| {
                let angle = std::f64::consts::FRAC_PI_2 + (k * 2) as f64 * 2.0 * std::f64::consts::PI / 5.0;
                Point::new(10.0 * angle.cos(), 10.0 * angle.sin())
            })
            .collect();
        assert!(!polygon_contains(&star, &Point::new(0.0, 0.0)));
        // Tip of the top spike is covered once.
        assert!(polygon_contains(&star, &Point::new(0.0, 8.0)));
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!polygon_contains(&line, &Point::new(5.0, 5.0)));
        assert!(!polygon_contains(&[], &Point::new(0.0, 0.0)));
    }
}
