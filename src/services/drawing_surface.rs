use std::collections::HashMap;

use thiserror::Error;

pub type Point = (f64, f64);

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("failed to draw on surface: {0}")]
    Draw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Center,
    Right,
}

/// Immediate-mode 2D target for chart primitives. Coordinates are pixels
/// with the origin in the top-left corner; angles are radians clockwise
/// from the positive x axis.
pub trait DrawingSurface {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self) -> Result<(), SurfaceError>;

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        color: Color,
        width: u32,
    ) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, top_left: Point, size: (f64, f64), color: Color)
    -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color)
    -> Result<(), SurfaceError>;

    fn fill_sector(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    ) -> Result<(), SurfaceError>;

    fn fill_text(
        &mut self,
        text: &str,
        anchor: Point,
        align: TextAlign,
        color: Color,
    ) -> Result<(), SurfaceError>;

    /// Flushes pending output; surfaces without a sink do nothing.
    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: u32,
    },
    Rect {
        top_left: Point,
        size: (f64, f64),
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Sector {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    },
    Text {
        text: String,
        anchor: Point,
        align: TextAlign,
        color: Color,
    },
}

/// Keeps every draw call in memory. `clear` discards what was drawn before.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

#[cfg(test)]
impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        color: Color,
        width: u32,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
        Ok(())
    }

    fn fill_rect(
        &mut self,
        top_left: Point,
        size: (f64, f64),
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Rect {
            top_left,
            size,
            color,
        });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn fill_sector(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Sector {
            center,
            radius,
            start_angle,
            end_angle,
            color,
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        anchor: Point,
        align: TextAlign,
        color: Color,
    ) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            align,
            color,
        });
        Ok(())
    }
}

/// Surfaces addressable by id, the way a page exposes canvases by element
/// id. A surface is handed out once, to the chart that binds it.
pub struct SurfaceSet<S> {
    surfaces: HashMap<String, S>,
}

impl<S> SurfaceSet<S> {
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, surface: S) {
        self.surfaces.insert(id.into(), surface);
    }

    pub fn take(&mut self, id: &str) -> Option<S> {
        self.surfaces.remove(id)
    }
}

impl<S> Default for SurfaceSet<S> {
    fn default() -> Self {
        Self::new()
    }
}
