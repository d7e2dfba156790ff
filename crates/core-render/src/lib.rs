//! Geometry projection + draw command composition.
//!
//! The render side never touches a drawing surface. It turns the current
//! layout into [`PlacedCell`]s (pure grid → canvas geometry) and then into a
//! flat, surface independent list of [`DrawCommand`]s which a host painter
//! executes in order.
//!
//! Exposed Components:
//! - `projector`: grid coordinates to canvas rectangles.
//! - `compose`: per-cell paint recipe (fill, border, icon, label or wrapped
//!   field lines).
//! - `style`: colours and metrics consumed by `compose`.
//! - `scheduler`: merges render invalidation marks into one decision per
//!   frame (`Full` repaint or `Fields` only refresh).
//!
//! Canvas units are whatever the host paints in (pixels, terminal cells);
//! every number here is `f32` in those units.

pub mod compose;
pub mod projector;
pub mod scheduler;
pub mod style;

pub use compose::{compose_cells, compose_fields, field_lines};
pub use projector::{PlacedCell, project};
pub use scheduler::{Decision, RenderDelta, RenderScheduler};
pub use style::FrameStyle;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One painting primitive, executed in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    /// Icon image scaled into `rect`.
    Icon {
        name: String,
        rect: Rect,
    },
    /// Single line of text centred on `(x, y)` (middle baseline), clipped
    /// to `clip`.
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Color,
        clip: Rect,
    },
}

/// Result of a full draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub layout: String,
    pub cells: Vec<PlacedCell>,
    pub commands: Vec<DrawCommand>,
}
