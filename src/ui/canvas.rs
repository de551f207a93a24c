//! Rasterizes a frame's display list into terminal cells.
//!
//! Every cell holds two square pixels stacked vertically, drawn as `▀` with
//! the upper pixel in the foreground colour and the lower one in the
//! background colour. Text goes on top, one character per cell.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::{Align, Canvas, DrawCommand, Surface, BACKDROP};

const HALF_BLOCK: &str = "▀";

/// Largest 4:3 rectangle (in pixels) that fits `area`, centred.
pub fn fit_viewport(area: Rect) -> Rect {
    // one cell = 1 px wide, 2 px tall
    let (w, h) = (area.width as u32, area.height as u32);
    let (cols, rows) = if w * 3 > h * 2 * 4 {
        ((h * 8 / 3).min(w), h)
    } else {
        (w, (w * 3 / 8).min(h))
    };
    let (cols, rows) = (cols as u16, rows as u16);
    Rect::new(
        area.x + (area.width - cols) / 2,
        area.y + (area.height - rows) / 2,
        cols,
        rows,
    )
}

struct Raster {
    pw: usize,
    ph: usize,
    sx: f32,
    sy: f32,
    pixels: Vec<Color>,
}

impl Raster {
    fn new(cols: usize, rows: usize, logical_w: f32, logical_h: f32) -> Self {
        let (pw, ph) = (cols, rows * 2);
        Self {
            pw,
            ph,
            sx: pw as f32 / logical_w,
            sy: ph as f32 / logical_h,
            pixels: vec![BACKDROP; pw * ph],
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.pw && (y as usize) < self.ph {
            self.pixels[y as usize * self.pw + x as usize] = color;
        }
    }

    fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.pw + x]
    }

    /// Pixel span covering `[start, start + len)`; never empty for len > 0.
    fn span(start: f32, len: f32, scale: f32) -> (i64, i64) {
        let a = (start * scale).floor() as i64;
        let b = ((start + len) * scale).ceil() as i64;
        (a, b.max(a + 1))
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(x, w, self.sx);
        let (y0, y1) = Self::span(y, h, self.sy);
        for py in y0.max(0)..y1.min(self.ph as i64) {
            for px in x0.max(0)..x1.min(self.pw as i64) {
                self.put(px, py, color);
            }
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = Self::span(x, w, self.sx);
        let (y0, y1) = Self::span(y, h, self.sy);
        for px in x0..x1 {
            self.put(px, y0, color);
            self.put(px, y1 - 1, color);
        }
        for py in y0..y1 {
            self.put(x0, py, color);
            self.put(x1 - 1, py, color);
        }
    }

    /// Paints pixels whose centre satisfies `inside(dx, dy)`, offsets in
    /// logical units from (cx, cy).
    fn fill_where(&mut self, cx: f32, cy: f32, r: f32, color: Color, inside: impl Fn(f32, f32) -> bool) {
        let (x0, x1) = Self::span(cx - r, 2.0 * r, self.sx);
        let (y0, y1) = Self::span(cy - r, 2.0 * r, self.sy);
        let mut painted = false;
        for py in y0..y1 {
            for px in x0..x1 {
                let lx = (px as f32 + 0.5) / self.sx;
                let ly = (py as f32 + 0.5) / self.sy;
                if inside(lx - cx, ly - cy) {
                    self.put(px, py, color);
                    painted = true;
                }
            }
        }
        if !painted {
            self.put((cx * self.sx) as i64, (cy * self.sy) as i64, color);
        }
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        let (ax, ay) = (x1 * self.sx, y1 * self.sy);
        let (bx, by) = (x2 * self.sx, y2 * self.sy);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = ax + (bx - ax) * t;
            let py = ay + (by - ay) * t;
            // clamp so edge lines such as x = width remain visible
            let px = (px as i64).min(self.pw as i64 - 1);
            let py = (py as i64).min(self.ph as i64 - 1);
            self.put(px, py, color);
        }
    }

    fn draw(&mut self, cmd: &DrawCommand) {
        match *cmd {
            DrawCommand::FillRect { x, y, w, h, color } => self.fill_rect(x, y, w, h, color),
            DrawCommand::StrokeRect { x, y, w, h, color } => self.stroke_rect(x, y, w, h, color),
            DrawCommand::FillCircle { x, y, r, color } => {
                self.fill_where(x, y, r, color, |dx, dy| dx * dx + dy * dy <= r * r)
            }
            DrawCommand::StrokeCircle { x, y, r, color } => {
                let band = 1.0 / self.sx.min(self.sy);
                self.fill_where(x, y, r + band, color, |dx, dy| {
                    ((dx * dx + dy * dy).sqrt() - r).abs() <= band / 2.0
                })
            }
            DrawCommand::Line { x1, y1, x2, y2, color } => self.line(x1, y1, x2, y2, color),
            DrawCommand::Text { .. } => {}
        }
    }
}

/// Converts a recorded frame into `rows` lines of `cols` cells.
pub fn rasterize(canvas: &Canvas, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let (cols, rows) = (cols as usize, rows as usize);
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let mut raster = Raster::new(cols, rows, canvas.width(), canvas.height());
    let mut text: Vec<Option<(char, Color)>> = vec![None; cols * rows];

    for cmd in canvas.commands() {
        match cmd {
            DrawCommand::Text { text: s, x, y, color, align } => {
                let col_scale = cols as f32 / canvas.width();
                let row = ((*y * rows as f32 / canvas.height()) as i64).clamp(0, rows as i64 - 1);
                let len = s.chars().count() as i64;
                let mut col = (*x * col_scale) as i64;
                if *align == Align::Center {
                    col -= len / 2;
                }
                for (i, ch) in s.chars().enumerate() {
                    let c = col + i as i64;
                    if c >= 0 && (c as usize) < cols {
                        text[row as usize * cols + c as usize] = Some((ch, *color));
                    }
                }
            }
            other => raster.draw(other),
        }
    }

    (0..rows)
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|col| {
                    let top = raster.get(col, row * 2);
                    let bottom = raster.get(col, row * 2 + 1);
                    match text[row * cols + col] {
                        Some((ch, fg)) => Span::styled(String::from(ch), Style::default().fg(fg).bg(bottom)),
                        None => Span::styled(HALF_BLOCK, Style::default().fg(top).bg(bottom)),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Draws the frame into the largest 4:3 viewport inside `area` and returns
/// that viewport, which input needs for pointer rescaling.
pub fn render_surface(frame: &mut Frame, area: Rect, canvas: &Canvas) -> Rect {
    frame.render_widget(Block::default().style(Style::default().bg(Color::Rgb(5, 5, 12))), area);
    let viewport = fit_viewport(area);
    let lines = rasterize(canvas, viewport.width, viewport.height);
    frame.render_widget(Paragraph::new(lines), viewport);
    viewport
}
