//! Pointer, pinch and wheel handling.
//!
//! [`GestureController`] turns raw contact events into [`ViewState`]
//! mutations. The gesture is never stored as a separate mode flag: it is
//! derived from how many contacts are down whenever that number changes.

use crate::math::{same_angle, snap_angle};
use crate::state::ViewState;
use glam::DVec2;
use std::collections::BTreeMap;

/// Identifier of one pointer or touch contact
pub type ContactId = u64;

/// Scale factors from raw input units to state units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sensitivity {
    /// Radians per pixel of drag
    pub rotate: f64,
    /// Zoom per unit of wheel delta
    pub wheel: f64,
    /// Zoom per pixel of pinch distance change
    pub pinch: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Sensitivity {
            rotate: 0.01,
            wheel: 0.01,
            pinch: 0.01,
        }
    }
}

/// Current gesture, derived from the number of active contacts
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureMode {
    /// No contacts, or more than two
    #[default]
    Idle,
    /// One contact dragging the cube around
    Rotating(ContactId),
    /// Two contacts zooming. The baseline distance is unset until the first
    /// move after the pinch began.
    Pinching {
        first: ContactId,
        second: ContactId,
        baseline: Option<f64>,
    },
}

/// Tracks active contacts and applies gestures to a [`ViewState`]
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    sensitivity: Sensitivity,
    contacts: BTreeMap<ContactId, DVec2>,
    mode: GestureMode,
}

impl GestureController {
    pub fn new(sensitivity: Sensitivity) -> Self {
        GestureController {
            sensitivity,
            ..GestureController::default()
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// Last known position of a tracked contact
    pub fn contact_position(&self, id: ContactId) -> Option<DVec2> {
        self.contacts.get(&id).copied()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Whether any contact is currently down
    pub fn is_pointer_down(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Records a new contact. Restarting a known contact only moves its
    /// tracked position.
    pub fn contact_start(&mut self, id: ContactId, position: DVec2) {
        let previous = self.contacts.insert(id, position);
        if previous.is_none() {
            self.refresh_mode();
        }
    }

    /// Handles a contact moving. Returns whether the state changed.
    pub fn contact_move(&mut self, state: &mut ViewState, id: ContactId, position: DVec2) -> bool {
        let Some(&previous) = self.contacts.get(&id) else {
            return false;
        };

        match self.mode {
            GestureMode::Rotating(active) if active == id => {
                let delta = position - previous;
                let applied = self.rotate_by(state, delta.x, delta.y);
                // A snapped-away move keeps the old baseline so small moves add up.
                if applied {
                    self.contacts.insert(id, position);
                }
                applied
            }
            GestureMode::Pinching {
                first,
                second,
                baseline,
            } => {
                self.contacts.insert(id, position);
                let distance = match (self.contacts.get(&first), self.contacts.get(&second)) {
                    (Some(a), Some(b)) => a.distance(*b),
                    _ => return false,
                };
                let applied = match baseline {
                    Some(baseline) => {
                        let delta = distance - baseline;
                        self.zoom_by(state, -delta * self.sensitivity.pinch)
                    }
                    None => false,
                };
                self.mode = GestureMode::Pinching {
                    first,
                    second,
                    baseline: Some(distance),
                };
                applied
            }
            _ => {
                self.contacts.insert(id, position);
                false
            }
        }
    }

    /// Handles a contact lifting or being lost.
    pub fn contact_end(&mut self, id: ContactId) {
        if self.contacts.remove(&id).is_some() {
            self.refresh_mode();
        }
    }

    /// Drops every contact, e.g. when the pointer leaves the surface.
    pub fn cancel(&mut self) {
        if !self.contacts.is_empty() {
            self.contacts.clear();
            self.refresh_mode();
        }
    }

    /// Handles a wheel event. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, state: &mut ViewState, delta_y: f64) -> bool {
        self.zoom_by(state, delta_y * self.sensitivity.wheel)
    }

    /// Rotates by a drag delta in pixels, snapping when the state asks for it.
    ///
    /// Returns `false` when the resulting angles match the current ones, in
    /// which case nothing is committed.
    pub fn rotate_by(&self, state: &mut ViewState, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let orientation = state.orientation();
        let snap = orientation.snap_increment;
        let angle_y = snap_angle(orientation.angle_y - dx * self.sensitivity.rotate, snap);
        let angle_x = snap_angle(orientation.angle_x + dy * self.sensitivity.rotate, snap);

        // Snapping can land one ulp off the stored angle; that is still no move.
        let same_x = same_angle(angle_x, orientation.angle_x);
        let same_y = same_angle(angle_y, orientation.angle_y);
        if same_x && same_y {
            return false;
        }
        let angle_x = if same_x { orientation.angle_x } else { angle_x };
        let angle_y = if same_y { orientation.angle_y } else { angle_y };
        let applied = state.set_angles(angle_x, angle_y);
        if applied {
            tracing::debug!(
                angle_x = angle_x.to_degrees(),
                angle_y = angle_y.to_degrees(),
                "rotation applied"
            );
        }
        applied
    }

    /// Zooms out by `delta`, clamped to the state's zoom bounds.
    pub fn zoom_by(&self, state: &mut ViewState, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let applied = state.set_zoom(state.camera().zoom_scale - delta);
        if applied {
            tracing::debug!(zoom = state.camera().zoom_scale, "zoom applied");
        }
        applied
    }

    fn refresh_mode(&mut self) {
        let mut ids = self.contacts.keys().copied();
        let mode = match self.contacts.len() {
            1 => ids.next().map_or(GestureMode::Idle, GestureMode::Rotating),
            2 => match (ids.next(), ids.next()) {
                (Some(first), Some(second)) => GestureMode::Pinching {
                    first,
                    second,
                    baseline: None,
                },
                _ => GestureMode::Idle,
            },
            _ => GestureMode::Idle,
        };
        if mode != self.mode {
            tracing::debug!(?mode, contacts = self.contacts.len(), "gesture mode changed");
        }
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Axis, ZoomBounds};

    fn deg(value: f64) -> f64 {
        value.to_radians()
    }

    fn pos(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Multiples of 15 degrees whose radian value does not survive snapping bit for bit
    const GRID_DEGREES: [f64; 11] = [
        -165.0, -135.0, -120.0, -105.0, -75.0, -60.0, -30.0, -15.0, 75.0, 105.0, 150.0,
    ];

    #[test]
    fn test_mode_follows_contact_count() {
        let mut controller = GestureController::default();
        assert_eq!(controller.mode(), GestureMode::Idle);
        assert!(!controller.is_pointer_down());

        controller.contact_start(7, pos(0.0, 0.0));
        assert_eq!(controller.mode(), GestureMode::Rotating(7));
        assert!(controller.is_pointer_down());

        controller.contact_start(3, pos(10.0, 0.0));
        assert_eq!(
            controller.mode(),
            GestureMode::Pinching {
                first: 3,
                second: 7,
                baseline: None
            }
        );

        controller.contact_start(9, pos(20.0, 0.0));
        assert_eq!(controller.mode(), GestureMode::Idle);

        controller.contact_end(3);
        controller.contact_end(9);
        assert_eq!(controller.mode(), GestureMode::Rotating(7));

        controller.contact_end(7);
        assert_eq!(controller.mode(), GestureMode::Idle);
        assert!(!controller.is_pointer_down());
    }

    #[test]
    fn test_single_contact_rotates() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(100.0, 100.0));

        assert!(controller.contact_move(&mut state, 1, pos(110.0, 80.0)));
        assert_close(state.orientation().angle_y, -0.1);
        assert_close(state.orientation().angle_x, -0.2);
        assert_eq!(controller.contact_position(1), Some(pos(110.0, 80.0)));
    }

    #[test]
    fn test_move_of_unknown_contact_is_ignored() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        assert!(!controller.contact_move(&mut state, 4, pos(1.0, 1.0)));
        assert_eq!(controller.contact_count(), 0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut state = ViewState::default();
        state.set_angle(Axis::X, deg(175.0));
        let controller = GestureController::default();
        assert!(controller.rotate_by(&mut state, 0.0, deg(10.0) / 0.01));
        assert_close(state.orientation().angle_x, deg(-175.0));
    }

    #[test]
    fn test_snap_suppresses_small_rotation() {
        let mut state = ViewState::default();
        state.set_snap(deg(15.0));
        state.set_angle(Axis::X, deg(15.0));
        let controller = GestureController::default();

        assert!(!controller.rotate_by(&mut state, 0.0, deg(1.0) / 0.01));
        assert_eq!(state.orientation().angle_x, deg(15.0));

        assert!(controller.rotate_by(&mut state, 0.0, deg(7.5) / 0.01));
        assert_close(state.orientation().angle_x, deg(30.0));
    }

    #[test]
    fn test_snapped_moves_accumulate() {
        let mut state = ViewState::default();
        state.set_snap(deg(15.0));
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(0.0, 0.0));

        // 5px is about 2.9 degrees, below half a snap step.
        assert!(!controller.contact_move(&mut state, 1, pos(0.0, 5.0)));
        assert_eq!(controller.contact_position(1), Some(pos(0.0, 0.0)));
        assert!(!controller.contact_move(&mut state, 1, pos(0.0, 10.0)));
        assert_eq!(state.orientation().angle_x, 0.0);

        // 15px from the untouched baseline crosses the midpoint.
        assert!(controller.contact_move(&mut state, 1, pos(0.0, 15.0)));
        assert_close(state.orientation().angle_x, deg(15.0));
        assert_eq!(controller.contact_position(1), Some(pos(0.0, 15.0)));
    }

    #[test]
    fn test_small_move_from_grid_angle_keeps_baseline() {
        for degrees in GRID_DEGREES {
            let mut state = ViewState::default();
            state.set_snap(deg(15.0));
            state.set_angle(Axis::X, deg(degrees));
            state.set_angle(Axis::Y, deg(-degrees));
            let before = state;
            let mut controller = GestureController::default();
            controller.contact_start(1, pos(0.0, 0.0));

            assert!(
                !controller.contact_move(&mut state, 1, pos(1.0, 1.0)),
                "move applied from {degrees} degrees"
            );
            assert_eq!(state, before, "state changed from {degrees} degrees");
            assert_eq!(controller.contact_position(1), Some(pos(0.0, 0.0)));
        }
    }

    #[test]
    fn test_snapped_move_keeps_untouched_axis() {
        let mut state = ViewState::default();
        state.set_snap(deg(15.0));
        state.set_angle(Axis::Y, deg(-105.0));
        let angle_y = state.orientation().angle_y;
        let controller = GestureController::default();

        assert!(controller.rotate_by(&mut state, 0.0, deg(10.0) / 0.01));
        assert_close(state.orientation().angle_x, deg(15.0));
        assert_eq!(state.orientation().angle_y.to_bits(), angle_y.to_bits());
    }

    #[test]
    fn test_rotate_ignores_non_finite_delta() {
        let mut state = ViewState::default();
        let controller = GestureController::default();
        assert!(!controller.rotate_by(&mut state, f64::NAN, 0.0));
        assert!(!controller.rotate_by(&mut state, 0.0, f64::INFINITY));
        assert_eq!(state.orientation().angle_x, 0.0);
    }

    #[test]
    fn test_pinch_first_move_sets_baseline() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(0.0, 0.0));
        controller.contact_start(2, pos(100.0, 0.0));

        assert!(!controller.contact_move(&mut state, 2, pos(110.0, 0.0)));
        assert_eq!(state.camera().zoom_scale, 1.0);

        // Spreading by 10px zooms in by 10 * 0.01.
        assert!(controller.contact_move(&mut state, 2, pos(120.0, 0.0)));
        assert_close(state.camera().zoom_scale, 1.1);

        assert!(controller.contact_move(&mut state, 1, pos(20.0, 0.0)));
        assert_close(state.camera().zoom_scale, 0.9);
        assert_eq!(state.orientation().angle_x, 0.0);
        assert_eq!(state.orientation().angle_y, 0.0);
    }

    #[test]
    fn test_pinch_baseline_reset_after_count_change() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(0.0, 0.0));
        controller.contact_start(2, pos(100.0, 0.0));
        controller.contact_move(&mut state, 2, pos(100.0, 0.0));
        controller.contact_move(&mut state, 2, pos(150.0, 0.0));
        let zoom = state.camera().zoom_scale;

        controller.contact_start(3, pos(500.0, 500.0));
        controller.contact_end(3);
        assert!(matches!(
            controller.mode(),
            GestureMode::Pinching { baseline: None, .. }
        ));

        // Far from the old baseline, but the first move only re-establishes it.
        assert!(!controller.contact_move(&mut state, 2, pos(400.0, 0.0)));
        assert_eq!(state.camera().zoom_scale, zoom);
    }

    #[test]
    fn test_three_contacts_have_no_effect() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(0.0, 0.0));
        controller.contact_start(2, pos(10.0, 0.0));
        controller.contact_start(3, pos(20.0, 0.0));

        assert!(!controller.contact_move(&mut state, 1, pos(50.0, 50.0)));
        assert_eq!(controller.contact_position(1), Some(pos(50.0, 50.0)));
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_cancel_drops_contacts() {
        let mut controller = GestureController::default();
        controller.contact_start(1, pos(0.0, 0.0));
        controller.contact_start(2, pos(10.0, 0.0));
        controller.cancel();
        assert_eq!(controller.contact_count(), 0);
        assert_eq!(controller.mode(), GestureMode::Idle);
    }

    #[test]
    fn test_wheel_zooms() {
        let mut state = ViewState::default();
        let mut controller = GestureController::default();
        assert!(controller.wheel(&mut state, -10.0));
        assert_close(state.camera().zoom_scale, 1.1);
        assert!(controller.wheel(&mut state, 20.0));
        assert_close(state.camera().zoom_scale, 0.9);
    }

    #[test]
    fn test_zoom_clamps_and_zero_is_noop() {
        let mut state = ViewState::new(ZoomBounds::new(0.5, 2.0).unwrap());
        let controller = GestureController::default();

        assert!(!controller.zoom_by(&mut state, 0.0));
        assert!(controller.zoom_by(&mut state, -100.0));
        assert_eq!(state.camera().zoom_scale, 2.0);
        assert!(!controller.zoom_by(&mut state, -1.0));
        assert!(controller.zoom_by(&mut state, 100.0));
        assert_eq!(state.camera().zoom_scale, 0.5);
        assert!(!controller.zoom_by(&mut state, f64::NAN));

        for delta in [-3.7, -0.2, 0.0, 0.01, 0.4, 9.0, f64::MAX] {
            controller.zoom_by(&mut state, delta);
            let zoom = state.camera().zoom_scale;
            assert!((0.5..=2.0).contains(&zoom), "zoom {zoom} after {delta}");
        }
    }

    #[test]
    fn test_independent_controllers() {
        let mut a = GestureController::default();
        let b = GestureController::new(Sensitivity {
            rotate: 0.02,
            ..Sensitivity::default()
        });
        a.contact_start(1, pos(0.0, 0.0));
        assert!(a.is_pointer_down());
        assert!(!b.is_pointer_down());
        assert_eq!(b.sensitivity().rotate, 0.02);
    }
}
