//! ASCII spread plot for terminal output.
//!
//! A fixed-size character grid, kept deliberately simple so the output is
//! byte-for-byte deterministic and can be pinned by snapshot tests.
//!
//! Marks on the grid:
//! - `-` the normalized spread curve over a log energy axis
//! - `X` the crossing point
//! - `|` the sigma band boundaries

use crate::domain::{BowtieResult, SpreadCurve};

/// Render the normalized spread curve for one solved channel.
///
/// The x axis is log-energy; the y axis is the spread normalized by its
/// minimum, so the crossing always sits at `y = 1`.
pub fn render_spread_plot(
    name: &str,
    curve: &SpreadCurve,
    result: &BowtieResult,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(frame) = Frame::around(curve) else {
        return format!("Plot {name}: spread curve too short to draw\n");
    };
    let mut canvas = Canvas::blank(width, height);

    let mut prev: Option<(usize, usize)> = None;
    for (&e, &s) in curve.energy.iter().zip(curve.spread_norm.iter()) {
        let cell = frame.cell(e, s, width, height);
        match prev {
            Some(p) => canvas.segment(p, cell, '-'),
            None => canvas.mark(cell, '-'),
        }
        prev = Some(cell);
    }

    // Sigma margin boundaries first, crossing marker last (so it wins).
    for margin in [result.energy_margin_low, result.energy_margin_high] {
        if margin > 0.0 {
            canvas.vline(frame.col(margin, width), '|');
        }
    }
    canvas.stamp(frame.cell(result.effective_energy, 1.0, width, height), 'X');

    let mut out = format!(
        "Plot {name}: energy=[{:.3}, {:.3}] MeV | spread/min=[{:.2}, {:.2}]\n",
        frame.e_min, frame.e_max, frame.y_min, frame.y_max
    );
    out.push_str(&canvas.render());
    out
}

/// Data-space bounds of the plot, padded vertically so the curve does not
/// sit exactly on the border rows.
struct Frame {
    e_min: f64,
    e_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    /// `None` when the curve cannot span a frame (fewer than two distinct
    /// energies, or non-positive / non-finite ones).
    fn around(curve: &SpreadCurve) -> Option<Self> {
        let mut e_min = f64::INFINITY;
        let mut e_max = f64::NEG_INFINITY;
        for &e in &curve.energy {
            e_min = e_min.min(e);
            e_max = e_max.max(e);
        }
        if !(e_min.is_finite() && e_max.is_finite() && e_min > 0.0 && e_max > e_min) {
            return None;
        }

        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &s in &curve.spread_norm {
            y_min = y_min.min(s);
            y_max = y_max.max(s);
        }
        let (y_min, y_max) = if y_min.is_finite() && y_max.is_finite() && y_max > y_min {
            (y_min, y_max)
        } else {
            (0.0, 1.0)
        };
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

        Some(Self {
            e_min,
            e_max,
            y_min: y_min - pad,
            y_max: y_max + pad,
        })
    }

    /// Column for an energy (log scale).
    fn col(&self, e: f64, width: usize) -> usize {
        let width = width.max(2);
        let u = ((e.ln() - self.e_min.ln()) / (self.e_max.ln() - self.e_min.ln())).clamp(0.0, 1.0);
        (u * (width as f64 - 1.0)).round() as usize
    }

    /// Row for a spread value; the maximum maps to the top row.
    fn row(&self, y: f64, height: usize) -> usize {
        let height = height.max(2);
        let u = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        (height as f64 - 1.0 - u * (height as f64 - 1.0)).round() as usize
    }

    fn cell(&self, e: f64, y: f64, width: usize, height: usize) -> (usize, usize) {
        (self.col(e, width), self.row(y, height))
    }
}

/// Fixed-size character buffer where the first writer of a cell wins.
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    /// Write `ch` at `(col, row)` unless something is already drawn there.
    fn mark(&mut self, (col, row): (usize, usize), ch: char) {
        if col < self.width && row < self.height {
            let cell = &mut self.cells[row * self.width + col];
            if *cell == ' ' {
                *cell = ch;
            }
        }
    }

    /// Write `ch` unconditionally, covering anything beneath it.
    fn stamp(&mut self, (col, row): (usize, usize), ch: char) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = ch;
        }
    }

    /// Full-height vertical at `col`, drawn behind existing content.
    fn vline(&mut self, col: usize, ch: char) {
        for row in 0..self.height {
            self.mark((col, row), ch);
        }
    }

    /// Rasterize the segment between two cells (Bresenham).
    fn segment(&mut self, a: (usize, usize), b: (usize, usize), ch: char) {
        let (mut x, mut y) = (a.0 as isize, a.1 as isize);
        let (x1, y1) = (b.0 as isize, b.1 as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.mark((x as usize, y as usize), ch);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            out.extend(&self.cells[row * self.width..(row + 1) * self.width]);
            out.push('\n');
        }
        out
    }
}
