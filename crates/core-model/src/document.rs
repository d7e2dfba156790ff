//! Wire format for layout documents.
//!
//! ```json
//! { "name": "main", "rows": 2, "cols": 2,
//!   "buttons": [
//!     { "row": 0, "col": 0, "span": 2, "type": "text", "id": "log", "text": "Welcome" },
//!     { "row": 1, "col": 0, "text": "Next", "icon": "next.png", "action": "next_layout" },
//!     { "row": 1, "col": 1, "text": "Hi", "action": "append_text", "target": "log", "message": "hello" }
//!   ] }
//! ```
//!
//! Numbers are read as signed integers so that negative coordinates are
//! reported as `MalformedLayout` with the offending cell instead of a serde
//! type error. Unknown keys are ignored. An unknown `type` is drawn as a
//! button and an unknown `action` leaves the button inert; both are logged.

use crate::{Action, CellKind, CellSpec, LayoutDefect, LayoutDocument, LayoutError};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct RawLayout {
    pub name: String,
    pub rows: i64,
    pub cols: i64,
    #[serde(default)]
    pub buttons: Vec<RawCell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCell {
    pub row: i64,
    pub col: i64,
    #[serde(default)]
    pub span: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse and validate one JSON layout document.
pub fn parse_layout(json: &str) -> Result<LayoutDocument, LayoutError> {
    let raw: RawLayout = serde_json::from_str(json)?;
    LayoutDocument::try_from(raw)
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

impl RawCell {
    fn into_spec(self, layout: &str, index: usize, rows: u32, cols: u32) -> Result<CellSpec, LayoutError> {
        let defect = |d| LayoutError::malformed(layout, Some(index), d);
        let row = u32::try_from(self.row)
            .map_err(|_| defect(LayoutDefect::RowOutOfBounds { row: self.row, rows }))?;
        let col = u32::try_from(self.col)
            .map_err(|_| defect(LayoutDefect::ColOutOfBounds { col: self.col, cols }))?;
        let span = match self.span {
            None => 1,
            Some(s) => positive_u32(s).ok_or_else(|| defect(LayoutDefect::NonPositiveSpan))?,
        };
        let kind = match self.kind.as_deref() {
            None | Some("button") => CellKind::Button,
            Some("text") => CellKind::TextField,
            Some(other) => {
                warn!(
                    target: "model.layout",
                    layout,
                    cell = index,
                    cell_type = other,
                    "unknown_cell_type_as_button"
                );
                CellKind::Button
            }
        };
        let action = self.action.as_deref().and_then(|name| {
            let action = Action::from_wire(name, self.target.as_deref(), self.message.as_deref());
            if action.is_none() {
                warn!(
                    target: "model.layout",
                    layout,
                    cell = index,
                    action = name,
                    "unknown_action_ignored"
                );
            }
            action
        });
        Ok(CellSpec {
            row,
            col,
            span,
            kind,
            label: self.text,
            icon: self.icon,
            action,
            id: self.id,
        })
    }
}

impl TryFrom<RawLayout> for LayoutDocument {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        let rows = positive_u32(raw.rows)
            .ok_or_else(|| LayoutError::malformed(&raw.name, None, LayoutDefect::NonPositiveRows))?;
        let cols = positive_u32(raw.cols)
            .ok_or_else(|| LayoutError::malformed(&raw.name, None, LayoutDefect::NonPositiveCols))?;
        let cells = raw
            .buttons
            .into_iter()
            .enumerate()
            .map(|(index, cell)| cell.into_spec(&raw.name, index, rows, cols))
            .collect::<Result<Vec<_>, _>>()?;
        LayoutDocument::new(raw.name, rows, cols, cells)
    }
}
