//! Command line options

use clap::Parser;
use std::path::PathBuf;
use vanishing_cube::{Axis, RotationOrder, Sensitivity, ViewState, ZoomBounds};

#[derive(Parser, Debug)]
#[command(name = "vanishing-cube", version)]
#[command(about = "Rotate a wireframe cube in the terminal and watch its vanishing points")]
pub struct Cli {
    /// Rotation about the X axis, in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub angle_x: f64,

    /// Rotation about the Y axis, in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub angle_y: f64,

    /// Rotation order: yx (Y first) or xy (X first); also accepts 0 and 1
    #[arg(long, default_value = "yx")]
    pub order: String,

    /// Snap increment for dragging, in degrees (0 disables snapping)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub snap: f64,

    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    pub focal_length: f64,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub zoom: f64,

    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub zoom_min: f64,

    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub zoom_max: f64,

    /// Background grid cell size in pixels at zoom 1
    #[arg(long, default_value_t = 50.0)]
    pub grid_size: f64,

    /// Radians of rotation per pixel dragged
    #[arg(long, default_value_t = 0.01)]
    pub rotate_sensitivity: f64,

    /// Zoom change per unit of wheel delta
    #[arg(long, default_value_t = 0.01)]
    pub wheel_sensitivity: f64,

    /// Zoom change per pixel of pinch distance
    #[arg(long, default_value_t = 0.01)]
    pub pinch_sensitivity: f64,

    /// Show the parameter overlay
    #[arg(long, short)]
    pub debug: bool,

    /// Print the projected scene once and exit
    #[arg(long)]
    pub once: bool,

    /// Override the canvas width in terminal cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Override the canvas height in terminal cells
    #[arg(long)]
    pub height: Option<u16>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Builds the initial state. Values pass through the state setters, so
    /// angles are wrapped and zoom is clamped rather than rejected.
    pub fn view_state(&self) -> vanishing_cube::Result<ViewState> {
        let bounds = ZoomBounds::new(self.zoom_min, self.zoom_max)?;
        let mut state = ViewState::new(bounds);
        state.set_angle(Axis::X, self.angle_x.to_radians());
        state.set_angle(Axis::Y, self.angle_y.to_radians());
        state.set_order(RotationOrder::from_input(&self.order));
        state.set_snap(self.snap.to_radians());
        state.set_focal_length(self.focal_length);
        state.set_zoom(self.zoom);
        state.set_grid_cell_size(self.grid_size);
        Ok(state)
    }

    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity {
            rotate: self.rotate_sensitivity,
            wheel: self.wheel_sensitivity,
            pinch: self.pinch_sensitivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vanishing-cube").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn test_defaults() {
        let state = parse(&[]).view_state().unwrap();
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_angles_are_wrapped() {
        let state = parse(&["--angle-x", "270", "--angle-y", "-45"])
            .view_state()
            .unwrap();
        assert!((state.orientation().angle_x - (-90f64).to_radians()).abs() < 1e-12);
        assert!((state.orientation().angle_y - (-45f64).to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_order_values() {
        let state = parse(&["--order", "1"]).view_state().unwrap();
        assert_eq!(state.orientation().order, RotationOrder::XY);
        let state = parse(&["--order", "sideways"]).view_state().unwrap();
        assert_eq!(state.orientation().order, RotationOrder::YX);
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        let state = parse(&["--zoom", "50", "--snap", "-5", "--focal-length", "-2"])
            .view_state()
            .unwrap();
        assert_eq!(state.camera().zoom_scale, 10.0);
        assert_eq!(state.orientation().snap_increment, 0.0);
        assert_eq!(state.camera().focal_length, 0.0);
    }

    #[test]
    fn test_invalid_zoom_bounds_are_rejected() {
        let cli = parse(&["--zoom-min", "3", "--zoom-max", "2"]);
        assert!(cli.view_state().is_err());
    }

    #[test]
    fn test_sensitivity() {
        let cli = parse(&["--rotate-sensitivity", "0.02"]);
        assert_eq!(
            cli.sensitivity(),
            Sensitivity {
                rotate: 0.02,
                ..Sensitivity::default()
            }
        );
    }
}
