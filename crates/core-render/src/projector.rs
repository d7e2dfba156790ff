//! Grid → canvas geometry.
//!
//! `cell_w = canvas_w / cols`, `cell_h = canvas_h / rows`; a cell at
//! `(row, col)` spanning `span` columns occupies
//! `(col * cell_w, row * cell_h, cell_w * span, cell_h)`.
//!
//! Edges are computed from grid lines (`line * extent / n`) and the size is
//! trimmed so that `x + w` and `y + h` never pass the canvas edge in f32.
//!
//! Pure: identical inputs give identical output. The result is owned by the
//! caller's last draw pass and replaced wholesale on the next one.

use crate::Rect;
use core_model::{CellSpec, LayoutDocument};
use tracing::trace;

/// A cell with the geometry it was drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub spec: CellSpec,
    pub rect: Rect,
}

/// Compute geometry for every cell of `layout`, in declaration order.
pub fn project(layout: &LayoutDocument, canvas_width: f32, canvas_height: f32) -> Vec<PlacedCell> {
    let cell_w = canvas_width / layout.cols() as f32;
    let cell_h = canvas_height / layout.rows() as f32;
    trace!(
        target: "render.project",
        layout = layout.name(),
        cell_w,
        cell_h,
        cells = layout.cells().len(),
        "project"
    );
    layout
        .cells()
        .iter()
        .map(|spec| {
            let (x, w) = axis(spec.col, spec.span, layout.cols(), canvas_width);
            let (y, h) = axis(spec.row, 1, layout.rows(), canvas_height);
            PlacedCell {
                rect: Rect::new(x, y, w, h),
                spec: spec.clone(),
            }
        })
        .collect()
}

/// Start and size of grid lines `first..first + len` out of `n` on an axis
/// of `extent`. `start + size <= end <= extent` holds in f32.
fn axis(first: u32, len: u32, n: u32, extent: f32) -> (f32, f32) {
    let line = |i: u32| i as f32 * extent / n as f32;
    let start = line(first);
    let end = line(first + len).min(extent);
    let mut size = end - start;
    while size > 0.0 && start + size > end {
        size = size.next_down();
    }
    (start, size)
}
