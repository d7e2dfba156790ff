//! Cell paint recipe.
//!
//! Every cell emits, in order: `FillRect`, `StrokeRect`, then content.
//! - Button with a resolvable icon: `Icon` (side `min(w,h) * icon_scale`,
//!   centred, lifted by `icon_lift`) and the label at `y + h * icon_label_offset`.
//! - Button without one (absent or failed to load): label centred, no icon.
//! - Text field: store history joined by newlines, wrapped to the inner
//!   width. A block that fits is centred vertically; an overflowing block
//!   keeps the newest lines that fit, top aligned.
//!
//! Composition reads the store but never seeds it; seeding is the draw
//! pass's job so that a fields-only refresh stays read-only.

use crate::{DrawCommand, FrameStyle, PlacedCell, Rect};
use core_assets::IconResolver;
use core_model::CellKind;
use core_state::TextValueStore;
use core_text::{Measure, wrap};

/// Commands for every placed cell, in declaration order.
pub fn compose_cells<H, M: Measure>(
    cells: &[PlacedCell],
    store: &TextValueStore,
    icons: &IconResolver<H>,
    measure: &M,
    style: &FrameStyle,
) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(cells.len() * 4);
    for cell in cells {
        paint_chrome(cell, style, &mut out);
        match cell.spec.kind {
            CellKind::Button => paint_button(cell, icons, style, &mut out),
            CellKind::TextField => paint_field(cell, store, measure, style, &mut out),
        }
    }
    out
}

/// Commands for text field cells only (periodic refresh path).
pub fn compose_fields<M: Measure>(
    cells: &[PlacedCell],
    store: &TextValueStore,
    measure: &M,
    style: &FrameStyle,
) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    for cell in cells.iter().filter(|c| c.spec.is_text_field()) {
        paint_chrome(cell, style, &mut out);
        paint_field(cell, store, measure, style, &mut out);
    }
    out
}

/// Wrapped display lines for a text field, before vertical fitting.
///
/// Falls back to the static label when the store has no entry yet.
pub fn field_lines<M: Measure>(
    cell: &PlacedCell,
    store: &TextValueStore,
    measure: &M,
    style: &FrameStyle,
) -> Vec<String> {
    let content = cell
        .spec
        .field_id()
        .and_then(|id| store.history(id))
        .map(|h| h.joined())
        .unwrap_or_else(|| cell.spec.label_text().to_string());
    let inner_width = (cell.rect.w - 2.0 * style.padding).max(0.0);
    wrap(&content, inner_width, |s: &str| measure.measure(s)).collect()
}

fn paint_chrome(cell: &PlacedCell, style: &FrameStyle, out: &mut Vec<DrawCommand>) {
    let text_field = cell.spec.is_text_field();
    out.push(DrawCommand::FillRect {
        rect: cell.rect,
        color: style.fill_for(text_field),
    });
    out.push(DrawCommand::StrokeRect {
        rect: cell.rect,
        color: style.border,
        width: style.border_width,
    });
}

fn paint_button<H>(
    cell: &PlacedCell,
    icons: &IconResolver<H>,
    style: &FrameStyle,
    out: &mut Vec<DrawCommand>,
) {
    let Rect { x, y, w, h } = cell.rect;
    let icon = cell
        .spec
        .icon
        .as_deref()
        .filter(|name| icons.resolve(name).is_some());

    let label_y = match icon {
        Some(name) => {
            let size = w.min(h) * style.icon_scale;
            out.push(DrawCommand::Icon {
                name: name.to_string(),
                rect: Rect::new(
                    x + w / 2.0 - size / 2.0,
                    y + h / 2.0 - size / 2.0 - style.icon_lift,
                    size,
                    size,
                ),
            });
            y + h * style.icon_label_offset
        }
        None => cell.rect.center_y(),
    };

    let label = cell.spec.label_text();
    if !label.is_empty() {
        out.push(DrawCommand::Text {
            text: label.to_string(),
            x: cell.rect.center_x(),
            y: label_y,
            color: style.text_for(false),
            clip: cell.rect,
        });
    }
}

fn paint_field<M: Measure>(
    cell: &PlacedCell,
    store: &TextValueStore,
    measure: &M,
    style: &FrameStyle,
    out: &mut Vec<DrawCommand>,
) {
    let lines = field_lines(cell, store, measure, style);
    let rect = cell.rect;
    let line_height = style.line_height.max(f32::EPSILON);
    let capacity = (((rect.h - 2.0 * style.padding) / line_height).floor() as usize).max(1);

    let (visible, first_center) = if lines.len() > capacity {
        (
            &lines[lines.len() - capacity..],
            rect.y + style.padding + line_height / 2.0,
        )
    } else {
        let block = lines.len() as f32 * line_height;
        (
            &lines[..],
            rect.center_y() - block / 2.0 + line_height / 2.0,
        )
    };

    for (i, line) in visible.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        out.push(DrawCommand::Text {
            text: line.clone(),
            x: rect.center_x(),
            y: first_center + i as f32 * line_height,
            color: style.text_for(true),
            clip: rect,
        });
    }
}
