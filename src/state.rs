use crate::error::{Error, Result};
use crate::math::wrap_angle;
use std::fmt;

/// Which elementary rotation is applied to the cube first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationOrder {
    /// Rotate about Y, then about X
    #[default]
    YX,
    /// Rotate about X, then about Y
    XY,
}

impl RotationOrder {
    /// Parses a rotation order the way the numeric form field delivered it.
    ///
    /// Accepts `yx`/`0` and `xy`/`1` in any case. Anything else falls back to
    /// [`RotationOrder::YX`].
    pub fn from_input(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yx" | "0" => RotationOrder::YX,
            "xy" | "1" => RotationOrder::XY,
            other => {
                tracing::warn!(value = other, "unknown rotation order, using YX");
                RotationOrder::YX
            }
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RotationOrder::YX => RotationOrder::XY,
            RotationOrder::XY => RotationOrder::YX,
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationOrder::YX => f.write_str("YX"),
            RotationOrder::XY => f.write_str("XY"),
        }
    }
}

/// Rotation axis addressed by [`ViewState::set_angle`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Cube orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationState {
    /// Rotation about the X axis in radians, kept in `(-PI, PI]`
    pub angle_x: f64,
    /// Rotation about the Y axis in radians, kept in `(-PI, PI]`
    pub angle_y: f64,
    pub order: RotationOrder,
    /// Quantization step for interactive rotation in radians; zero disables snapping
    pub snap_increment: f64,
}

/// Virtual camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub focal_length: f64,
    /// Zoom factor, kept within the active [`ZoomBounds`]
    pub zoom_scale: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        CameraState {
            focal_length: 5.0,
            zoom_scale: 1.0,
        }
    }
}

/// Closed range the zoom scale is clamped to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    min: f64,
    max: f64,
}

impl ZoomBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(Error::InvalidZoomBounds { min, max });
        }
        Ok(ZoomBounds { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        ZoomBounds {
            min: 0.1,
            max: 10.0,
        }
    }
}

/// Background grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridState {
    pub cell_size: f64,
}

impl GridState {
    /// Size of one background tile at the given zoom, rounded to whole pixels
    pub fn tile_size(&self, zoom_scale: f64) -> f64 {
        (zoom_scale * self.cell_size).round()
    }
}

impl Default for GridState {
    fn default() -> Self {
        GridState { cell_size: 50.0 }
    }
}

/// Everything the projection reads and the gesture controller writes.
///
/// Fields are readable directly; writes go through the setters so the
/// wrapping and clamping invariants always hold. Every setter reports whether
/// the stored value actually changed, so callers know when to redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewState {
    orientation: OrientationState,
    camera: CameraState,
    zoom_bounds: ZoomBounds,
    grid: GridState,
}

impl ViewState {
    pub fn new(zoom_bounds: ZoomBounds) -> Self {
        let mut state = ViewState {
            zoom_bounds,
            ..ViewState::default()
        };
        state.camera.zoom_scale = zoom_bounds.clamp(state.camera.zoom_scale);
        state
    }

    pub fn orientation(&self) -> &OrientationState {
        &self.orientation
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.zoom_bounds
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Current background tile size in pixels
    pub fn grid_tile_size(&self) -> f64 {
        self.grid.tile_size(self.camera.zoom_scale)
    }

    /// Sets one rotation angle in radians, wrapped into `(-PI, PI]`.
    /// Non-finite input is ignored.
    pub fn set_angle(&mut self, axis: Axis, radians: f64) -> bool {
        if !radians.is_finite() {
            return false;
        }
        let wrapped = wrap_angle(radians);
        let slot = match axis {
            Axis::X => &mut self.orientation.angle_x,
            Axis::Y => &mut self.orientation.angle_y,
        };
        replace_if_changed(slot, wrapped)
    }

    /// Sets both angles at once; used when a gesture commits a rotation.
    pub(crate) fn set_angles(&mut self, angle_x: f64, angle_y: f64) -> bool {
        let x_changed = self.set_angle(Axis::X, angle_x);
        let y_changed = self.set_angle(Axis::Y, angle_y);
        x_changed || y_changed
    }

    pub fn set_order(&mut self, order: RotationOrder) -> bool {
        if self.orientation.order == order {
            return false;
        }
        self.orientation.order = order;
        true
    }

    /// Sets the snap increment in radians. Negative or NaN input disables snapping.
    pub fn set_snap(&mut self, radians: f64) -> bool {
        let snap = if radians.is_nan() { 0.0 } else { radians.max(0.0) };
        if snap.is_infinite() {
            return false;
        }
        replace_if_changed(&mut self.orientation.snap_increment, snap)
    }

    /// Sets the focal length. Negative input clamps to zero; non-finite input is ignored.
    pub fn set_focal_length(&mut self, focal_length: f64) -> bool {
        if !focal_length.is_finite() {
            return false;
        }
        replace_if_changed(&mut self.camera.focal_length, focal_length.max(0.0))
    }

    /// Sets the zoom scale, clamped to the current bounds. NaN is ignored.
    pub fn set_zoom(&mut self, zoom_scale: f64) -> bool {
        if zoom_scale.is_nan() {
            return false;
        }
        let clamped = self.zoom_bounds.clamp(zoom_scale);
        replace_if_changed(&mut self.camera.zoom_scale, clamped)
    }

    /// Replaces the zoom bounds and re-clamps the current zoom into them.
    pub fn set_zoom_bounds(&mut self, bounds: ZoomBounds) -> bool {
        let bounds_changed = self.zoom_bounds != bounds;
        self.zoom_bounds = bounds;
        let zoom_changed = self.set_zoom(self.camera.zoom_scale);
        bounds_changed || zoom_changed
    }

    /// Sets the grid cell size. Non-finite or non-positive input is ignored.
    pub fn set_grid_cell_size(&mut self, cell_size: f64) -> bool {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return false;
        }
        replace_if_changed(&mut self.grid.cell_size, cell_size)
    }
}

fn replace_if_changed(slot: &mut f64, value: f64) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
