//! Wireframe cube viewer that shows perspective projection and vanishing points.
//!
//! The cube's orientation and the camera live in a [`ViewState`]. A
//! [`GestureController`] turns pointer, pinch and wheel input into state
//! changes, and [`compute_scene`] projects the 12 cube edges and the six
//! principal-axis vanishing points from scratch after every change.
//! [`CubeView`] wires all of this to a terminal.

pub mod error;
pub mod geometry;
pub mod gesture;
pub mod graphics;
pub mod math;
pub mod projection;
pub mod state;
pub mod widget;

pub use error::{Error, Result};
pub use gesture::{ContactId, GestureController, GestureMode, Sensitivity};
pub use graphics::Canvas;
pub use projection::{compute_scene, Scene, ScreenPoint, Viewport};
pub use state::{Axis, RotationOrder, ViewState, ZoomBounds};
pub use widget::CubeView;
