//! Layout document model.
//!
//! A layout is a named `rows x cols` grid of cells. Each cell is either a
//! Button (label, optional icon, optional action) or a TextField (an `id`
//! keyed into the text value store, its label seeding that entry).
//!
//! Invariants (hold for every value handed out by this crate):
//! * `rows >= 1`, `cols >= 1`.
//! * For every cell: `row < rows`, `col < cols`, `span >= 1`,
//!   `col + span <= cols`.
//! * Every TextField has a non-empty `id`.
//! * Documents are immutable after construction; there is no mutation API.
//! * Within a [`LayoutSet`] names are unique and declaration order is kept.
//!
//! Raw JSON parsing lives in [`document`]; it produces the same validated
//! types so callers never see an unchecked grid.

mod action;
pub mod document;
mod error;

pub use action::Action;
pub use document::parse_layout;
pub use error::{LayoutDefect, LayoutError};

use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Button,
    TextField,
}

/// One grid-aligned interactive region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpec {
    pub row: u32,
    pub col: u32,
    /// Horizontal merge width in grid columns.
    pub span: u32,
    pub kind: CellKind,
    pub label: Option<String>,
    /// Button only.
    pub icon: Option<String>,
    /// Button only.
    pub action: Option<Action>,
    /// Required for TextField; key into the text value store.
    pub id: Option<String>,
}

impl CellSpec {
    pub fn button(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            span: 1,
            kind: CellKind::Button,
            label: None,
            icon: None,
            action: None,
            id: None,
        }
    }

    pub fn text_field(row: u32, col: u32, id: impl Into<String>) -> Self {
        Self {
            kind: CellKind::TextField,
            id: Some(id.into()),
            ..Self::button(row, col)
        }
    }

    pub fn with_span(mut self, span: u32) -> Self {
        self.span = span;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_text_field(&self) -> bool {
        self.kind == CellKind::TextField
    }

    /// Label text, empty when absent.
    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// Store id for text fields (validated non-empty); `None` for buttons.
    pub fn field_id(&self) -> Option<&str> {
        match self.kind {
            CellKind::TextField => self.id.as_deref(),
            CellKind::Button => None,
        }
    }
}

/// A validated, immutable layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDocument {
    name: String,
    rows: u32,
    cols: u32,
    cells: Vec<CellSpec>,
}

impl LayoutDocument {
    /// Validate and build a document. Button-only attributes found on text
    /// fields are dropped with a warning rather than rejected.
    pub fn new(
        name: impl Into<String>,
        rows: u32,
        cols: u32,
        mut cells: Vec<CellSpec>,
    ) -> Result<Self, LayoutError> {
        let name = name.into();
        let doc_defect = |defect| LayoutError::malformed(&name, None, defect);
        if name.trim().is_empty() {
            return Err(doc_defect(LayoutDefect::EmptyName));
        }
        if rows == 0 {
            return Err(doc_defect(LayoutDefect::NonPositiveRows));
        }
        if cols == 0 {
            return Err(doc_defect(LayoutDefect::NonPositiveCols));
        }

        for (index, cell) in cells.iter_mut().enumerate() {
            let cell_defect = |defect| LayoutError::malformed(&name, Some(index), defect);
            if cell.row >= rows {
                return Err(cell_defect(LayoutDefect::RowOutOfBounds {
                    row: i64::from(cell.row),
                    rows,
                }));
            }
            if cell.col >= cols {
                return Err(cell_defect(LayoutDefect::ColOutOfBounds {
                    col: i64::from(cell.col),
                    cols,
                }));
            }
            if cell.span == 0 {
                return Err(cell_defect(LayoutDefect::NonPositiveSpan));
            }
            if u64::from(cell.col) + u64::from(cell.span) > u64::from(cols) {
                return Err(cell_defect(LayoutDefect::SpanOverflow {
                    col: cell.col,
                    span: cell.span,
                    cols,
                }));
            }
            if cell.kind == CellKind::TextField {
                if cell.id.as_deref().is_none_or(|id| id.is_empty()) {
                    return Err(cell_defect(LayoutDefect::MissingFieldId));
                }
                let dropped_icon = cell.icon.take().is_some();
                let dropped_action = cell.action.take().is_some();
                if dropped_icon || dropped_action {
                    warn!(
                        target: "model.layout",
                        layout = name.as_str(),
                        cell = index,
                        "text_field_button_attributes_ignored"
                    );
                }
            }
        }

        debug!(
            target: "model.layout",
            layout = name.as_str(),
            rows,
            cols,
            cells = cells.len(),
            "layout_validated"
        );
        Ok(Self {
            name,
            rows,
            cols,
            cells,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn rows(&self) -> u32 {
        self.rows
    }
    pub fn cols(&self) -> u32 {
        self.cols
    }
    /// Cells in declaration order.
    pub fn cells(&self) -> &[CellSpec] {
        &self.cells
    }
}

/// Ordered collection of uniquely named layouts. The order is the
/// navigation order used for next/prev.
#[derive(Debug, Clone, Default)]
pub struct LayoutSet {
    documents: Vec<LayoutDocument>,
}

impl LayoutSet {
    pub fn new(documents: Vec<LayoutDocument>) -> Result<Self, LayoutError> {
        let mut seen = BTreeSet::new();
        for doc in &documents {
            if !seen.insert(doc.name()) {
                return Err(LayoutError::malformed(
                    doc.name(),
                    None,
                    LayoutDefect::DuplicateName,
                ));
            }
        }
        Ok(Self { documents })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&LayoutDocument> {
        self.documents.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutDocument> {
        self.documents.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(LayoutDocument::name)
    }

    /// Every icon referenced by any button, deduplicated and sorted.
    pub fn icon_names(&self) -> BTreeSet<String> {
        self.documents
            .iter()
            .flat_map(|d| d.cells())
            .filter_map(|c| c.icon.clone())
            .collect()
    }

    pub fn into_documents(self) -> Vec<LayoutDocument> {
        self.documents
    }
}
