use crate::error::Result;
use crate::gesture::{ContactId, GestureController, Sensitivity};
use crate::graphics::Canvas;
use crate::projection::{compute_scene, Scene};
use crate::state::ViewState;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};

/// Contact driven by a left-button drag
const MOUSE_CONTACT: ContactId = 0;
/// Fixed contact at the viewport centre while the right button is down
const PINCH_ANCHOR: ContactId = 1;
/// Contact following the pointer while the right button is down
const PINCH_POINTER: ContactId = 2;

/// Wheel delta reported for one scroll notch
const WHEEL_NOTCH: f64 = 10.0;
/// Focal length change per key press
const FOCAL_STEP: f64 = 0.1;
/// Grid cell size change per key press
const GRID_STEP: f64 = 1.0;
/// Snap increments cycled with `s`, in degrees
const SNAP_STEPS: [f64; 4] = [0.0, 5.0, 15.0, 45.0];

/// What the event loop should do after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Quit,
}

/// Terminal view of the cube
pub struct CubeView {
    state: ViewState,
    initial_state: ViewState,
    gestures: GestureController,
    canvas: Canvas,
    /// Show the parameter overlay
    debug: bool,
}

impl CubeView {
    pub fn new(state: ViewState, sensitivity: Sensitivity, columns: u16, rows: u16) -> Self {
        CubeView {
            state,
            initial_state: state,
            gestures: GestureController::new(sensitivity),
            canvas: Canvas::new(columns as usize, rows as usize),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Projects the current state onto the current canvas size
    pub fn scene(&self) -> Scene {
        compute_scene(&self.state, self.canvas.viewport())
    }

    /// Rasterizes the current scene into the canvas
    pub fn paint(&mut self) {
        let scene = self.scene();
        let tile_size = self.state.grid_tile_size();
        self.canvas.draw_scene(&scene, tile_size);
    }

    /// Handles one terminal event
    pub fn handle_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key_event) => self.handle_key(key_event),
            Event::Mouse(mouse_event) => self.handle_mouse(mouse_event),
            Event::Resize(columns, rows) => {
                self.gestures.cancel();
                self.canvas = Canvas::new(*columns as usize, *rows as usize);
                tracing::debug!(columns, rows, "terminal resized");
                Action::Redraw
            }
            Event::FocusLost => {
                self.gestures.cancel();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_key(&mut self, key_event: &KeyEvent) -> Action {
        if key_event.kind != KeyEventKind::Press {
            return Action::None;
        }
        let changed = match key_event.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.debug = !self.debug;
                true
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let order = self.state.orientation().order.toggled();
                self.state.set_order(order)
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let snap = next_snap_step(self.state.orientation().snap_increment);
                self.state.set_snap(snap.to_radians())
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let focal_length = self.state.camera().focal_length + FOCAL_STEP;
                self.state.set_focal_length(focal_length)
            }
            KeyCode::Char('-') => {
                let focal_length = self.state.camera().focal_length - FOCAL_STEP;
                self.state.set_focal_length(focal_length)
            }
            KeyCode::Char(']') => {
                let cell_size = self.state.grid().cell_size + GRID_STEP;
                self.state.set_grid_cell_size(cell_size)
            }
            KeyCode::Char('[') => {
                let cell_size = self.state.grid().cell_size - GRID_STEP;
                self.state.set_grid_cell_size(cell_size)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                // Reset to the values the viewer started with
                self.gestures.cancel();
                let changed = self.state != self.initial_state;
                self.state = self.initial_state;
                changed
            }
            _ => false,
        };
        if changed {
            Action::Redraw
        } else {
            Action::None
        }
    }

    fn handle_mouse(&mut self, mouse_event: &MouseEvent) -> Action {
        let position = Canvas::cell_center(mouse_event.column, mouse_event.row);
        let changed = match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.gestures.contact_start(MOUSE_CONTACT, position);
                false
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.gestures.contact_move(&mut self.state, MOUSE_CONTACT, position)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.gestures.contact_end(MOUSE_CONTACT);
                false
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let anchor = self.canvas.viewport().center();
                self.gestures.contact_start(PINCH_ANCHOR, anchor);
                self.gestures.contact_start(PINCH_POINTER, position);
                false
            }
            MouseEventKind::Drag(MouseButton::Right) => {
                self.gestures.contact_move(&mut self.state, PINCH_POINTER, position)
            }
            MouseEventKind::Up(MouseButton::Right) => {
                self.gestures.contact_end(PINCH_POINTER);
                self.gestures.contact_end(PINCH_ANCHOR);
                false
            }
            MouseEventKind::ScrollUp => self.gestures.wheel(&mut self.state, -WHEEL_NOTCH),
            MouseEventKind::ScrollDown => self.gestures.wheel(&mut self.state, WHEEL_NOTCH),
            _ => false,
        };
        if changed {
            Action::Redraw
        } else {
            Action::None
        }
    }

    /// Draws the canvas and, in debug mode, the parameter overlay
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.paint();
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in self.canvas.lines().enumerate() {
            queue!(out, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        if self.debug {
            for (row, line) in self.overlay().into_iter().enumerate() {
                queue!(out, cursor::MoveTo(1, row as u16), Print(line))?;
            }
        }
        out.flush()
    }

    /// Lines of the debug overlay
    pub fn overlay(&self) -> Vec<String> {
        let orientation = self.state.orientation();
        let camera = self.state.camera();
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!(
                "Angle X: {:.1}, Angle Y: {:.1}, Order: {}",
                orientation.angle_x.to_degrees(),
                orientation.angle_y.to_degrees(),
                orientation.order
            ),
            format!("Snap: {:.1}", orientation.snap_increment.to_degrees()),
            format!(
                "Focal length: {:.2}, Zoom: {:.2}, Grid: {}px",
                camera.focal_length,
                camera.zoom_scale,
                self.state.grid_tile_size()
            ),
            format!("Gesture: {:?}", self.gestures.mode()),
            "drag rotate | right-drag pinch | wheel zoom | o s +/- [ ] r d q".to_string(),
        ]
    }

    /// Runs the interactive viewer until the user quits.
    ///
    /// Redraws only in response to events; there is no animation timer.
    pub fn run(mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::Hide
        )?;
        tracing::info!(
            columns = self.canvas.columns(),
            rows = self.canvas.rows(),
            "viewer started"
        );

        let result = self.event_loop(&mut stdout);

        let restored = execute!(
            stdout,
            cursor::Show,
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .and_then(|_| terminal::disable_raw_mode());
        result?;
        restored?;
        Ok(())
    }

    fn event_loop<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.render(out)?;
        loop {
            let event = event::read()?;
            match self.handle_event(&event) {
                Action::Quit => return Ok(()),
                Action::Redraw => self.render(out)?,
                Action::None => {}
            }
        }
    }
}

fn next_snap_step(current_radians: f64) -> f64 {
    let current = current_radians.to_degrees();
    SNAP_STEPS
        .iter()
        .copied()
        .find(|step| *step > current + 1e-6)
        .unwrap_or(SNAP_STEPS[0])
}

/// Terminal size in cells, preferring `termsize` and falling back to crossterm
pub fn terminal_size() -> Result<(u16, u16)> {
    if let Some(size) = termsize::get() {
        if size.cols > 0 && size.rows > 0 {
            return Ok((size.cols, size.rows));
        }
    }
    Ok(terminal::size()?)
}
