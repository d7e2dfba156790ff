//! Paint style consumed by `compose`.
//!
//! Defaults reproduce the kiosk look on a pixel canvas: black buttons with
//! white labels, white text fields with black text, a 2 unit white border,
//! icons at 40% of the cell's short side lifted 10 units above centre with
//! the label pushed down to 70% of the cell height.

use crate::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub button_fill: Color,
    pub button_text: Color,
    pub field_fill: Color,
    pub field_text: Color,
    pub border: Color,
    pub border_width: f32,
    /// Vertical advance between wrapped field lines.
    pub line_height: f32,
    /// Inset applied on every side of a text field before wrapping.
    pub padding: f32,
    /// Icon side as a fraction of `min(w, h)`.
    pub icon_scale: f32,
    /// Upward shift of the icon from the vertical centre.
    pub icon_lift: f32,
    /// Label centre as a fraction of cell height when an icon is shown.
    pub icon_label_offset: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            button_fill: Color::BLACK,
            button_text: Color::WHITE,
            field_fill: Color::WHITE,
            field_text: Color::BLACK,
            border: Color::WHITE,
            border_width: 2.0,
            line_height: 24.0,
            padding: 8.0,
            icon_scale: 0.4,
            icon_lift: 10.0,
            icon_label_offset: 0.7,
        }
    }
}

impl FrameStyle {
    /// Metrics for a character-cell canvas: one row per line, a one cell
    /// inset for the border, no icon lift.
    pub fn terminal() -> Self {
        Self {
            border_width: 1.0,
            line_height: 1.0,
            padding: 1.0,
            icon_lift: 0.0,
            ..Self::default()
        }
    }

    pub fn fill_for(&self, text_field: bool) -> Color {
        if text_field {
            self.field_fill
        } else {
            self.button_fill
        }
    }

    pub fn text_for(&self, text_field: bool) -> Color {
        if text_field {
            self.field_text
        } else {
            self.button_text
        }
    }
}
