//! Projected rectangles stay on the canvas and tile it without overlap
//! for any valid layout.

use core_model::{CellSpec, LayoutDocument};
use core_render::project;
use proptest::prelude::*;

proptest! {
    #[test]
    fn cells_within_canvas(
        rows in 1u32..12,
        cols in 1u32..12,
        width in 1.0f32..4000.0,
        height in 1.0f32..3000.0,
        picks in prop::collection::vec((0u32..12, 0u32..12, 1u32..12), 1..20),
    ) {
        let cells: Vec<CellSpec> = picks
            .into_iter()
            .map(|(r, c, s)| {
                let row = r % rows;
                let col = c % cols;
                let span = 1 + (s - 1) % (cols - col);
                CellSpec::button(row, col).with_span(span)
            })
            .collect();
        let layout = LayoutDocument::new("p", rows, cols, cells).unwrap();
        let placed = project(&layout, width, height);
        prop_assert_eq!(placed.len(), layout.cells().len());
        for p in &placed {
            prop_assert!(p.rect.x >= 0.0 && p.rect.y >= 0.0);
            prop_assert!(p.rect.right() <= width, "{:?} exceeds {}", p.rect, width);
            prop_assert!(p.rect.bottom() <= height, "{:?} exceeds {}", p.rect, height);
            prop_assert!(p.rect.w > 0.0 && p.rect.h > 0.0);
        }
    }
}
