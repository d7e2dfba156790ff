use core_render::{PlacedCell, Point};

/// First cell, in declaration order, whose rectangle contains `point`.
///
/// Edges are inclusive, so a point on a border shared by two cells resolves
/// to the one declared earlier.
pub fn hit_test(point: Point, cells: &[PlacedCell]) -> Option<&PlacedCell> {
    cells.iter().find(|c| c.rect.contains(point))
}
