//! 2D drawing layer
//!
//! Games draw through the [`Surface`] trait. [`CommandBuffer`] records the
//! calls as plain data (tests, headless runs); on wasm `CanvasSurface` forwards
//! them to a canvas 2D context.

pub mod scenes;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use scenes::Scene;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// From a 0xRRGGBB literal
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// CSS color string (`#rrggbb`, or `rgba(...)` when translucent)
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a as f32 / 255.0)
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::from_hex(0x000000);
    pub const WHITE: Color = Color::from_hex(0xffffff);

    pub const DODGER_PLAYER: Color = Color::from_hex(0x0ea5e9);
    pub const DODGER_OBSTACLE: Color = Color::from_hex(0xef4444);

    pub const SNAKE_BACKGROUND: Color = Color::from_hex(0x1a1a2e);
    pub const SNAKE_GRID: Color = Color::from_hex(0x16213e);
    pub const SNAKE_FOOD: Color = Color::from_hex(0xef4444);
    pub const SNAKE_BONUS_FILL: Color = Color::from_hex(0xfbbf24);
    pub const SNAKE_BONUS_STROKE: Color = Color::from_hex(0xf59e0b);
    pub const SNAKE_HEAD: Color = Color::from_hex(0x22c55e);
    pub const SNAKE_BODY: Color = Color::from_hex(0x16a34a);

    pub const MEMORY_TARGET: Color = Color::from_hex(0x3b82f6);
    pub const MEMORY_HINT: Color = Color::from_hex(0x22c55e);
}

/// Drawing primitives a game needs
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32);
    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Color, line_width: f32);
    /// Text centered on `center`
    fn fill_text(&mut self, text: &str, center: Vec2, size_px: f32, color: Color);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: Color,
    },
    StrokePolygon {
        points: Vec<Vec2>,
        color: Color,
        line_width: f32,
    },
    StrokeLine {
        a: Vec2,
        b: Vec2,
        color: Color,
        line_width: f32,
    },
    FillText {
        text: String,
        center: Vec2,
        size_px: f32,
        color: Color,
    },
}

/// Surface that records every call; `clear` starts a new frame
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All text drawn this frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            line_width,
        });
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeLine {
            a,
            b,
            color,
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, center: Vec2, size_px: f32, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            center,
            size_px,
            color,
        });
    }
}
