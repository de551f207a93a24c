//! The logical drawing surface every game paints onto.
//!
//! Games draw in an 800×600 coordinate space with the origin at the top-left
//! corner and `y` growing downwards. [`Canvas`] records the primitives of a
//! frame as a display list; the terminal UI rasterizes that list into cells
//! whenever the screen is redrawn.

use ratatui::style::Color;

pub const SURFACE_WIDTH: f32 = 800.0;
pub const SURFACE_HEIGHT: f32 = 600.0;

/// Shared dark backdrop used by all six games (#0a0a1a).
pub const BACKDROP: Color = Color::Rgb(10, 10, 26);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    StrokeRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    FillCircle { x: f32, y: f32, r: f32, color: Color },
    StrokeCircle { x: f32, y: f32, r: f32, color: Color },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, color: Color },
    Text { text: String, x: f32, y: f32, color: Color, align: Align },
}

pub trait Surface {
    fn bounds(&self) -> Bounds;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color);
    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, color: Color);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color, align: Align);

    fn width(&self) -> f32 {
        self.bounds().width
    }

    fn height(&self) -> f32 {
        self.bounds().height
    }
}

/// Display-list surface. Primitives are kept in paint order until the next
/// [`Surface::clear`].
#[derive(Debug, Default)]
pub struct Canvas {
    bounds: Bounds,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn this frame, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for Canvas {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { x, y, r, color });
    }

    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle { x, y, r, color });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color, align: Align) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color,
            align,
        });
    }
}
