//! Character grid rasterizer for draw commands.
//!
//! Canvas units are terminal cells. A rectangle covers the cells
//! `[round(x), round(x + w)) x [round(y), round(y + h))`, clamped to the
//! grid. Per command:
//! - `FillRect`: background colour, cleared to spaces.
//! - `StrokeRect`: box-drawing outline in the stroke colour (width is
//!   ignored beyond "present").
//! - `Icon`: a shaded block over the icon rectangle, at least one cell.
//! - `Text`: centred on `x`, on row `floor(y)`, clipped to the clip rect
//!   minus its one cell border.
//!
//! Flushing batches runs of equally coloured cells into one `Print`.

use anyhow::Result;
use core_render::{Color, DrawCommand, Rect};
use core_text::{display_width, egc_width};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color as CColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::TerminalCapabilities;

const ICON_SHADE: &str = "▒";

/// One terminal cell. A wide grapheme occupies its first cell; the cell to
/// its right holds an empty continuation symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCell {
    pub symbol: String,
    pub fg: Color,
    pub bg: Color,
}

impl Default for RasterCell {
    fn default() -> Self {
        Self {
            symbol: " ".to_string(),
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// Cell span `[start, end)` on one axis.
fn span(start: f32, len: f32, limit: u16) -> (u16, u16) {
    let clamp = |v: f32| v.round().clamp(0.0, f32::from(limit)) as u16;
    (clamp(start), clamp(start + len))
}

#[derive(Debug, Clone)]
pub struct Raster {
    width: u16,
    height: u16,
    cells: Vec<RasterCell>,
}

impl Raster {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![RasterCell::default(); usize::from(width) * usize::from(height)],
        }
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(RasterCell::default());
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&RasterCell> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Symbols of row `y` concatenated (continuations contribute nothing).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.symbol.as_str())
            .collect()
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut RasterCell> {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells.get_mut(i)
        } else {
            None
        }
    }

    fn cols(&self, rect: &Rect) -> (u16, u16) {
        span(rect.x, rect.w, self.width)
    }

    fn rows(&self, rect: &Rect) -> (u16, u16) {
        span(rect.y, rect.h, self.height)
    }

    /// Execute `commands` in order.
    pub fn paint(&mut self, commands: &[DrawCommand]) {
        for cmd in commands {
            match cmd {
                DrawCommand::FillRect { rect, color } => self.fill(rect, *color),
                DrawCommand::StrokeRect { rect, color, width } => {
                    if *width > 0.0 {
                        self.stroke(rect, *color);
                    }
                }
                DrawCommand::Icon { name, rect } => self.icon(name, rect),
                DrawCommand::Text {
                    text,
                    x,
                    y,
                    color,
                    clip,
                } => self.text(text, *x, *y, *color, clip),
            }
        }
        trace!(target: "render.raster", commands = commands.len(), "painted");
    }

    fn fill(&mut self, rect: &Rect, color: Color) {
        let (x0, x1) = self.cols(rect);
        let (y0, y1) = self.rows(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(c) = self.cell_mut(x, y) {
                    c.symbol = " ".to_string();
                    c.bg = color;
                }
            }
        }
    }

    fn put(&mut self, x: u16, y: u16, symbol: &str, fg: Color) {
        if let Some(c) = self.cell_mut(x, y) {
            c.symbol = symbol.to_string();
            c.fg = fg;
        }
    }

    fn stroke(&mut self, rect: &Rect, color: Color) {
        let (x0, x1) = self.cols(rect);
        let (y0, y1) = self.rows(rect);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let (right, bottom) = (x1 - 1, y1 - 1);
        for x in x0..=right {
            self.put(x, y0, "─", color);
            self.put(x, bottom, "─", color);
        }
        for y in y0..=bottom {
            self.put(x0, y, "│", color);
            self.put(right, y, "│", color);
        }
        if right > x0 && bottom > y0 {
            self.put(x0, y0, "┌", color);
            self.put(right, y0, "┐", color);
            self.put(x0, bottom, "└", color);
            self.put(right, bottom, "┘", color);
        }
    }

    fn icon(&mut self, name: &str, rect: &Rect) {
        let (x0, mut x1) = self.cols(rect);
        let (y0, mut y1) = self.rows(rect);
        if x1 <= x0 {
            x1 = x0 + 1;
        }
        if y1 <= y0 {
            y1 = y0 + 1;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                let fg = self.cell(x, y).map_or(Color::WHITE, |c| contrast(c.bg));
                self.put(x, y, ICON_SHADE, fg);
            }
        }
        trace!(target: "render.raster", icon = name, x0, y0, x1, y1, "icon_block");
    }

    fn text(&mut self, text: &str, x: f32, y: f32, color: Color, clip: &Rect) {
        let (cx0, cx1) = self.cols(clip);
        let (cy0, cy1) = self.rows(clip);
        // Keep the border column intact when there is room inside it.
        let (cx0, cx1) = if cx1 - cx0 > 2 {
            (cx0 + 1, cx1 - 1)
        } else {
            (cx0, cx1)
        };
        if y < 0.0 {
            return;
        }
        let row = y.floor() as u16;
        if row < cy0 || row >= cy1 {
            return;
        }

        let width = f32::from(display_width(text));
        let start = (x - width / 2.0).floor();
        let mut col = start as i32;
        for g in text.graphemes(true) {
            let w = i32::from(egc_width(g));
            if col + w > i32::from(cx1) {
                break;
            }
            if col >= i32::from(cx0) {
                let c = col as u16;
                self.put(c, row, g, color);
                if w == 2 {
                    self.put(c + 1, row, "", color);
                }
            }
            col += w;
        }
    }

    /// Write the whole grid to `out`.
    pub fn flush<W: Write>(&self, out: &mut W, caps: TerminalCapabilities) -> Result<()> {
        let mut prints = 0usize;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            let mut run = String::new();
            let mut colors: Option<(Color, Color)> = None;
            for x in 0..self.width {
                let Some(cell) = self.cell(x, y) else {
                    continue;
                };
                if cell.symbol.is_empty() {
                    continue;
                }
                if colors != Some((cell.fg, cell.bg)) {
                    if !run.is_empty() {
                        queue!(out, Print(std::mem::take(&mut run)))?;
                        prints += 1;
                    }
                    queue!(
                        out,
                        SetForegroundColor(to_terminal(cell.fg, caps)),
                        SetBackgroundColor(to_terminal(cell.bg, caps))
                    )?;
                    colors = Some((cell.fg, cell.bg));
                }
                run.push_str(&cell.symbol);
            }
            if !run.is_empty() {
                queue!(out, Print(run))?;
                prints += 1;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()?;
        trace!(target: "render.raster", prints, rows = self.height, "flushed");
        Ok(())
    }
}

/// Black or white, whichever reads on `bg`.
fn contrast(bg: Color) -> Color {
    let luma = 299 * u32::from(bg.r) + 587 * u32::from(bg.g) + 114 * u32::from(bg.b);
    if luma > 128_000 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

fn to_terminal(color: Color, caps: TerminalCapabilities) -> CColor {
    if caps.truecolor {
        return CColor::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        };
    }
    let level = |v: u8| (u16::from(v) * 5 / 255) as u8;
    CColor::AnsiValue(16 + 36 * level(color.r) + 6 * level(color.g) + level(color.b))
}
