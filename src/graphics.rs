use crate::projection::{Scene, ScreenPoint, Viewport};
use glam::DVec2;

/// Width of one terminal cell in virtual pixels
pub const CELL_WIDTH: f64 = 8.0;
/// Height of one terminal cell in virtual pixels
pub const CELL_HEIGHT: f64 = 16.0;
/// Half-width of the X mark drawn on each vanishing point, in pixels
pub const CROSS_HALF_WIDTH: f64 = 5.0;

const EMPTY: char = ' ';
const GRID: char = '·';
const EDGE: char = '#';
const VANISHING_POINT: char = 'X';

/// Character grid that scene geometry is rasterized into.
///
/// Geometry arrives in virtual pixels so the projection sees a surface with
/// roughly square pixels; each cell covers [`CELL_WIDTH`] by [`CELL_HEIGHT`].
pub struct Canvas {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(columns: usize, rows: usize) -> Self {
        Canvas {
            columns,
            rows,
            cells: vec![EMPTY; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Pixel size of the surface, handed to the projection as its viewport
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.columns as f64 * CELL_WIDTH,
            self.rows as f64 * CELL_HEIGHT,
        )
    }

    /// Centre of a cell in pixels
    pub fn cell_center(column: u16, row: u16) -> DVec2 {
        DVec2::new(
            (column as f64 + 0.5) * CELL_WIDTH,
            (row as f64 + 0.5) * CELL_HEIGHT,
        )
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    pub fn get(&self, column: usize, row: usize) -> Option<char> {
        if column < self.columns && row < self.rows {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    /// Text of each row, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.columns.max(1))
            .take(self.rows)
            .map(|row| row.iter().collect())
    }

    fn plot(&mut self, column: isize, row: isize, glyph: char) {
        if column >= 0 && row >= 0 && (column as usize) < self.columns && (row as usize) < self.rows
        {
            self.cells[row as usize * self.columns + column as usize] = glyph;
        }
    }

    fn to_cell(point: DVec2) -> Option<(isize, isize)> {
        let column = (point.x / CELL_WIDTH).floor();
        let row = (point.y / CELL_HEIGHT).floor();
        // Far-off points would overflow the cell walk; treat them as off screen.
        let limit = (isize::MAX / 4) as f64;
        if column.abs() > limit || row.abs() > limit {
            return None;
        }
        Some((column as isize, row as isize))
    }

    /// Dots every `tile_size` pixels. Tiles smaller than a cell are skipped.
    pub fn draw_grid(&mut self, tile_size: f64) {
        if tile_size.is_nan() || tile_size < CELL_WIDTH {
            return;
        }
        let viewport = self.viewport();
        let mut y = 0.0;
        while y < viewport.height {
            let mut x = 0.0;
            while x < viewport.width {
                if let Some((column, row)) = Self::to_cell(DVec2::new(x, y)) {
                    self.plot(column, row, GRID);
                }
                x += tile_size;
            }
            y += tile_size;
        }
    }

    /// Draws a line between two points in pixels using Bresenham's algorithm.
    /// The segment is clipped to the surface first, so far-off endpoints only
    /// cost the cells that are actually visible.
    pub fn draw_line(&mut self, from: DVec2, to: DVec2) {
        let Some((from, to)) = self.clip_to_surface(from, to) else {
            return;
        };
        let (Some((mut x0, mut y0)), Some((x1, y1))) = (Self::to_cell(from), Self::to_cell(to))
        else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, EDGE);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Liang-Barsky clip of a pixel segment against the surface rectangle.
    /// Returns `None` when no part of the segment is on the surface.
    fn clip_to_surface(&self, from: DVec2, to: DVec2) -> Option<(DVec2, DVec2)> {
        let delta = to - from;
        if !from.is_finite() || !delta.is_finite() {
            return None;
        }
        let viewport = self.viewport();
        let boundaries = [
            (-delta.x, from.x),
            (delta.x, viewport.width - from.x),
            (-delta.y, from.y),
            (delta.y, viewport.height - from.y),
        ];
        let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
        for (p, q) in boundaries {
            if p == 0.0 {
                // Parallel to this edge: either fully inside it or fully outside.
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
            if enter > exit {
                return None;
            }
        }
        Some((from + delta * enter, from + delta * exit))
    }

    /// X-shaped mark centred on a point
    pub fn draw_cross(&mut self, center: DVec2) {
        let offsets = [
            DVec2::new(-CROSS_HALF_WIDTH, -CROSS_HALF_WIDTH),
            DVec2::new(CROSS_HALF_WIDTH, CROSS_HALF_WIDTH),
            DVec2::new(-CROSS_HALF_WIDTH, CROSS_HALF_WIDTH),
            DVec2::new(CROSS_HALF_WIDTH, -CROSS_HALF_WIDTH),
        ];
        for offset in offsets {
            if let Some((column, row)) = Self::to_cell(center + offset) {
                self.plot(column, row, VANISHING_POINT);
            }
        }
        if let Some((column, row)) = Self::to_cell(center) {
            self.plot(column, row, VANISHING_POINT);
        }
    }

    /// Clears the surface and draws every finite edge and vanishing point.
    pub fn draw_scene(&mut self, scene: &Scene, tile_size: f64) {
        self.clear();
        self.draw_grid(tile_size);
        for &(from, to) in &scene.lines {
            if let (ScreenPoint::Finite(from), ScreenPoint::Finite(to)) = (from, to) {
                self.draw_line(from, to);
            }
        }
        for point in scene.vanishing_points.iter().filter_map(|p| p.finite()) {
            self.draw_cross(point);
        }
    }
}
