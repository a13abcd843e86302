//! Fixed cube geometry shared by the projection and the renderer.

use glam::DVec3;

/// Corners of the axis-aligned cube `[-1, 1]^3`
pub const CUBE_VERTICES: [DVec3; 8] = [
    DVec3::new(-1.0, -1.0, -1.0), // 0
    DVec3::new(1.0, -1.0, -1.0),  // 1
    DVec3::new(1.0, 1.0, -1.0),   // 2
    DVec3::new(-1.0, 1.0, -1.0),  // 3
    DVec3::new(-1.0, -1.0, 1.0),  // 4
    DVec3::new(1.0, -1.0, 1.0),   // 5
    DVec3::new(1.0, 1.0, 1.0),    // 6
    DVec3::new(-1.0, 1.0, 1.0),   // 7
];

/// Cube edges as pairs of indices into [`CUBE_VERTICES`]
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0), // Near face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4), // Far face
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7), // Connecting edges
];

/// Signed principal axes, one vanishing point each
pub const AXIS_DIRECTIONS: [DVec3; 6] = [
    DVec3::X,
    DVec3::NEG_X,
    DVec3::Y,
    DVec3::NEG_Y,
    DVec3::Z,
    DVec3::NEG_Z,
];

/// Display names for [`AXIS_DIRECTIONS`]
pub const AXIS_LABELS: [&str; 6] = ["+X", "-X", "+Y", "-Y", "+Z", "-Z"];

/// Distance along each axis direction used to stand in for a point at infinity
pub const VANISHING_DISTANCE: f64 = 1e12;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_differ_in_one_coordinate() {
        for &(a, b) in &CUBE_EDGES {
            let delta = CUBE_VERTICES[a] - CUBE_VERTICES[b];
            let differing = delta.to_array().iter().filter(|d| **d != 0.0).count();
            assert_eq!(differing, 1, "edge ({a}, {b})");
        }
    }

    #[test]
    fn test_edges_form_three_families_of_four() {
        let mut families = [0usize; 3];
        for &(a, b) in &CUBE_EDGES {
            let delta = CUBE_VERTICES[a] - CUBE_VERTICES[b];
            let axis = delta
                .to_array()
                .iter()
                .position(|d| *d != 0.0)
                .unwrap();
            families[axis] += 1;
        }
        assert_eq!(families, [4, 4, 4]);
    }

    #[test]
    fn test_edges_are_unique() {
        for (i, &(a, b)) in CUBE_EDGES.iter().enumerate() {
            for &(c, d) in &CUBE_EDGES[i + 1..] {
                assert!(!((a == c && b == d) || (a == d && b == c)));
            }
        }
    }

    #[test]
    fn test_axis_directions_are_unit() {
        for direction in AXIS_DIRECTIONS {
            assert_eq!(direction.length(), 1.0);
        }
    }
}
