use thiserror::Error;

/// What exactly is wrong with a layout document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutDefect {
    #[error("layout name is empty")]
    EmptyName,
    #[error("layout name is not unique")]
    DuplicateName,
    #[error("rows must be positive")]
    NonPositiveRows,
    #[error("cols must be positive")]
    NonPositiveCols,
    #[error("row {row} outside 0..{rows}")]
    RowOutOfBounds { row: i64, rows: u32 },
    #[error("col {col} outside 0..{cols}")]
    ColOutOfBounds { col: i64, cols: u32 },
    #[error("span must be positive")]
    NonPositiveSpan,
    #[error("col {col} + span {span} exceeds {cols} columns")]
    SpanOverflow { col: u32, span: u32, cols: u32 },
    #[error("text field has no id")]
    MissingFieldId,
}

#[derive(Debug, Error)]
pub enum LayoutError {
    /// Static layout data violates the grid invariants. Fatal at startup.
    #[error("malformed layout `{layout}`{}: {defect}", cell_suffix(.cell))]
    MalformedLayout {
        layout: String,
        /// Zero-based declaration index; `None` for document level defects.
        cell: Option<usize>,
        defect: LayoutDefect,
    },
    #[error("layout document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LayoutError {
    pub(crate) fn malformed(layout: &str, cell: Option<usize>, defect: LayoutDefect) -> Self {
        Self::MalformedLayout {
            layout: layout.to_string(),
            cell,
            defect,
        }
    }

    /// Offending layout name (empty for parse failures).
    pub fn layout(&self) -> &str {
        match self {
            Self::MalformedLayout { layout, .. } => layout,
            Self::Parse(_) => "",
        }
    }

    pub fn cell(&self) -> Option<usize> {
        match self {
            Self::MalformedLayout { cell, .. } => *cell,
            Self::Parse(_) => None,
        }
    }

    pub fn defect(&self) -> Option<&LayoutDefect> {
        match self {
            Self::MalformedLayout { defect, .. } => Some(defect),
            Self::Parse(_) => None,
        }
    }
}

fn cell_suffix(cell: &Option<usize>) -> String {
    cell.map(|i| format!(" (cell {i})")).unwrap_or_default()
}
