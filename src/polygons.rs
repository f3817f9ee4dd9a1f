//! Areas, distances, and inclusion tests for polygons in the plane.
//!
//! Used by [`crate::frames::Panel`] to decide whether the beam footprint is
//! inside a sample panel and how far it is from the nearest edge.

use nalgebra::Vector2;

use super::constants::COINCIDENCE_TOLERANCE;

/// Signed area of the triangle p1, p2, p3, with p2 as the vertex.
/// Counter-clockwise input gives a negative value.
pub fn triarea(p1: &Vector2<f64>, p2: &Vector2<f64>, p3: &Vector2<f64>) -> f64 {
    let n1 = p1 - p2;
    let n2 = p3 - p2;
    0.5 * (n1.x * n2.y - n1.y * n2.x)
}

/// Signed areas of the triangles formed by p and each polygon edge.
///
/// Edges are consecutive vertex pairs, wrapping around so the last vertex
/// pairs with the first.
pub fn point_areas(p: &Vector2<f64>, vertices: &[Vector2<f64>]) -> Vec<f64> {
    let len = vertices.len();
    (0..len)
        .map(|n| triarea(p, &vertices[(n + len - 1) % len], &vertices[n]))
        .collect()
}

/// Distance from point p to the segment a-b.
///
/// Degenerates to the nearer endpoint distance when a and b coincide. The
/// obtuse-angle tests pick an endpoint when the perpendicular foot falls
/// outside the segment.
pub fn dist_from_tri(p: &Vector2<f64>, a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    let area = triarea(p, a, b).abs();
    let d = (a - b).norm();
    let s1 = (a - p).norm();
    let s2 = (b - p).norm();
    if d < COINCIDENCE_TOLERANCE {
        s1.min(s2)
    } else if s1 * s1 > d * d + s2 * s2 {
        s2
    } else if s2 * s2 > d * d + s1 * s1 {
        s1
    } else {
        2.0 * area / d
    }
}

/// Minimum distance from p to any edge of the polygon.
///
/// An empty vertex list yields infinity.
pub fn min_dist(p: &Vector2<f64>, vertices: &[Vector2<f64>]) -> f64 {
    let len = vertices.len();
    (0..len)
        .map(|n| dist_from_tri(p, &vertices[(n + len - 1) % len], &vertices[n]))
        .fold(f64::INFINITY, f64::min)
}

/// Drop vertices that coincide with their predecessor (wrapping).
pub fn prune_points(vertices: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let len = vertices.len();
    (0..len)
        .filter(|&n| {
            let diff = vertices[(n + len - 1) % len] - vertices[n];
            diff.norm() >= COINCIDENCE_TOLERANCE
        })
        .map(|n| vertices[n])
        .collect()
}

/// True iff p is strictly inside the polygon. Works for convex polygons only.
///
/// The point is inside iff the signed areas against every edge share one
/// sign; a point exactly on an edge produces a zero area and reports outside.
pub fn is_in_poly(p: &Vector2<f64>, vertices: &[Vector2<f64>]) -> bool {
    let pruned = prune_points(vertices);
    let areas = point_areas(p, &pruned);
    if areas.is_empty() {
        return false;
    }
    areas.iter().all(|&a| a < 0.0) || areas.iter().all(|&a| a > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Vector2<f64>> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_triarea_sign() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, 0.0);
        let c = Vector2::new(0.0, 1.0);
        // Counter-clockwise winding is negative, reversing it flips the sign
        assert_relative_eq!(triarea(&a, &b, &c), -0.5, epsilon = 1e-12);
        assert_relative_eq!(triarea(&c, &b, &a), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_is_in_poly_unit_square() {
        let square = unit_square();
        assert!(is_in_poly(&Vector2::new(0.5, 0.5), &square));
        assert!(is_in_poly(&Vector2::new(0.01, 0.99), &square));
        assert!(!is_in_poly(&Vector2::new(1.5, 0.5), &square));
        assert!(!is_in_poly(&Vector2::new(-0.1, 0.5), &square));
        // A point exactly on the boundary is not inside
        assert!(!is_in_poly(&Vector2::new(0.0, 0.5), &square));
    }

    #[test]
    fn test_is_in_poly_prunes_duplicates() {
        let mut square = unit_square();
        square.insert(2, Vector2::new(1.0, 0.0));
        assert!(is_in_poly(&Vector2::new(0.5, 0.5), &square));
        assert!(!is_in_poly(&Vector2::new(2.0, 0.5), &square));
    }

    #[test]
    fn test_dist_from_tri() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(2.0, 0.0);
        // Perpendicular foot inside the segment
        assert_relative_eq!(
            dist_from_tri(&Vector2::new(1.0, 1.0), &a, &b),
            1.0,
            epsilon = 1e-12
        );
        // Past an endpoint, distance is to the endpoint
        assert_relative_eq!(
            dist_from_tri(&Vector2::new(3.0, 0.0), &a, &b),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            dist_from_tri(&Vector2::new(-3.0, 4.0), &a, &b),
            5.0,
            epsilon = 1e-12
        );
        // Degenerate segment reduces to point distance
        assert_relative_eq!(
            dist_from_tri(&Vector2::new(3.0, 4.0), &a, &a),
            5.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_min_dist_unit_square() {
        let square = unit_square();
        assert_relative_eq!(
            min_dist(&Vector2::new(0.5, 0.5), &square),
            0.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            min_dist(&Vector2::new(0.5, 0.2), &square),
            0.2,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            min_dist(&Vector2::new(2.0, 0.5), &square),
            1.0,
            epsilon = 1e-12
        );
    }
}
