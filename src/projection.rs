//! Perspective projection of the cube and its vanishing points.
//!
//! [`compute_scene`] is a pure function of the view state and the viewport:
//! it rebuilds the rotation and the camera matrix on every call and keeps no
//! cache, so it can run after every parameter change.

use crate::geometry::{AXIS_DIRECTIONS, CUBE_EDGES, CUBE_VERTICES, VANISHING_DISTANCE};
use crate::math::{rotation_x, rotation_y, to_homogeneous};
use crate::state::{OrientationState, RotationOrder, ViewState};
use glam::{DMat3, DVec2, DVec3, DVec4};
use std::fmt;

/// Pixels per unit of focal length before zoom is applied
const FOCAL_PIXELS_PER_UNIT: f64 = 100.0;

/// Relative size below which the homogeneous divisor counts as zero
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Drawing surface size in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// Principal point of the camera, at the centre of the viewport
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A projected point on screen.
///
/// Points whose perspective divisor vanishes are reported as
/// [`ScreenPoint::AtInfinity`] instead of carrying infinite or NaN
/// coordinates. Renderers skip them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScreenPoint {
    Finite(DVec2),
    AtInfinity,
}

impl ScreenPoint {
    pub fn finite(self) -> Option<DVec2> {
        match self {
            ScreenPoint::Finite(point) => Some(point),
            ScreenPoint::AtInfinity => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, ScreenPoint::Finite(_))
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenPoint::Finite(point) => write!(f, "({:.2}, {:.2})", point.x, point.y),
            ScreenPoint::AtInfinity => f.write_str("at infinity"),
        }
    }
}

/// Projected cube edge
pub type Segment = (ScreenPoint, ScreenPoint);

/// One frame worth of projected geometry
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Index-aligned with [`CUBE_EDGES`]
    pub lines: [Segment; 12],
    /// Index-aligned with [`AXIS_DIRECTIONS`]
    pub vanishing_points: [ScreenPoint; 6],
}

/// Combined 3x4 camera matrix, intrinsics times extrinsics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMatrix {
    rows: [DVec4; 3],
}

impl CameraMatrix {
    /// Builds `K * [I | (0, 0, f)]` for the given focal length, zoom and viewport.
    pub fn new(focal_length: f64, zoom_scale: f64, viewport: Viewport) -> Self {
        let scale = focal_length * FOCAL_PIXELS_PER_UNIT * zoom_scale;
        let center = viewport.center();
        let intrinsic = DMat3::from_cols(
            DVec3::new(scale, 0.0, 0.0),
            DVec3::new(0.0, scale, 0.0),
            DVec3::new(center.x, center.y, 1.0),
        );
        let extrinsic = [
            DVec4::new(1.0, 0.0, 0.0, 0.0),
            DVec4::new(0.0, 1.0, 0.0, 0.0),
            DVec4::new(0.0, 0.0, 1.0, focal_length),
        ];

        let row = |i: usize| {
            let k = intrinsic.row(i);
            extrinsic[0] * k.x + extrinsic[1] * k.y + extrinsic[2] * k.z
        };
        CameraMatrix {
            rows: [row(0), row(1), row(2)],
        }
    }

    /// Multiplies a homogeneous point, returning `(x, y, w)`.
    pub fn apply(&self, point: DVec4) -> DVec3 {
        DVec3::new(
            self.rows[0].dot(point),
            self.rows[1].dot(point),
            self.rows[2].dot(point),
        )
    }

    /// Projects a Euclidean point all the way to the screen.
    pub fn project(&self, point: DVec3) -> ScreenPoint {
        perspective_divide(self.apply(to_homogeneous(point)))
    }
}

/// Rotation applied to the cube for the given orientation
pub fn cube_transform(orientation: &OrientationState) -> DMat3 {
    let rx = rotation_x(orientation.angle_x);
    let ry = rotation_y(orientation.angle_y);
    match orientation.order {
        RotationOrder::YX => rx * ry,
        RotationOrder::XY => ry * rx,
    }
}

/// Divides `(x, y)` by `w`, flagging a vanishing divisor as a point at infinity.
pub fn perspective_divide(homogeneous: DVec3) -> ScreenPoint {
    let DVec3 { x, y, z: w } = homogeneous;
    let magnitude = x.abs().max(y.abs()).max(w.abs());
    if !magnitude.is_finite() || w.abs() <= DEGENERATE_EPSILON * magnitude {
        return ScreenPoint::AtInfinity;
    }
    ScreenPoint::Finite(DVec2::new(x / w, y / w))
}

/// Projects the cube edges and the six vanishing points for the current state.
pub fn compute_scene(state: &ViewState, viewport: Viewport) -> Scene {
    let transform = cube_transform(state.orientation());
    let camera = state.camera();
    let camera_matrix = CameraMatrix::new(camera.focal_length, camera.zoom_scale, viewport);

    let vertices = CUBE_VERTICES.map(|vertex| camera_matrix.project(transform * vertex));
    let lines = CUBE_EDGES.map(|(from, to)| (vertices[from], vertices[to]));
    let vanishing_points = AXIS_DIRECTIONS
        .map(|direction| camera_matrix.project(transform * (direction * VANISHING_DISTANCE)));

    tracing::trace!(
        angle_x = state.orientation().angle_x,
        angle_y = state.orientation().angle_y,
        width = viewport.width,
        height = viewport.height,
        "computed scene"
    );

    Scene {
        lines,
        vanishing_points,
    }
}
