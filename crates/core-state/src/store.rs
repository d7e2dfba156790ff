use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Maximum number of lines retained per text field.
pub const TEXT_HISTORY_MAX: usize = 15;

/// Capped oldest-first line history. Pushing past the cap evicts from the
/// front, so `len() <= TEXT_HISTORY_MAX` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedHistory {
    lines: VecDeque<String>,
}

impl BoundedHistory {
    pub fn single(line: impl Into<String>) -> Self {
        let mut lines = VecDeque::with_capacity(TEXT_HISTORY_MAX);
        lines.push_back(line.into());
        Self { lines }
    }

    /// Append, returning the evicted oldest line if the cap was exceeded.
    pub fn push(&mut self, line: impl Into<String>) -> Option<String> {
        self.lines.push_back(line.into());
        if self.lines.len() > TEXT_HISTORY_MAX {
            self.lines.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }

    /// Lines joined by `\n`, ready for wrapping.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }
}

/// Per-field message history keyed by text field id.
///
/// Entries appear lazily (seeded from the field label on first draw) and
/// then change only through [`set`](Self::set) / [`append`](Self::append).
/// Presence, not emptiness, gates seeding: an entry explicitly set to a
/// blank-looking line is never re-seeded.
#[derive(Debug, Clone, Default)]
pub struct TextValueStore {
    entries: HashMap<String, BoundedHistory>,
}

impl TextValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `[label]` if `id` has no entry. Returns true when seeded.
    pub fn ensure_seeded(&mut self, id: &str, label: &str) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries
            .insert(id.to_string(), BoundedHistory::single(label));
        trace!(target: "state.store", id, "seeded");
        true
    }

    /// Replace the entry with a single line. No-op (false) when either
    /// argument is empty.
    pub fn set(&mut self, id: &str, message: &str) -> bool {
        if id.is_empty() || message.is_empty() {
            trace!(target: "state.store", id, "set_ignored_missing_parameter");
            return false;
        }
        self.entries
            .insert(id.to_string(), BoundedHistory::single(message));
        trace!(target: "state.store", id, len = message.len(), "set");
        true
    }

    /// Append a line, evicting the oldest beyond [`TEXT_HISTORY_MAX`]. No-op
    /// (false) when either argument is empty. Appending to an unseen id
    /// creates the entry with just this line.
    pub fn append(&mut self, id: &str, message: &str) -> bool {
        if id.is_empty() || message.is_empty() {
            trace!(target: "state.store", id, "append_ignored_missing_parameter");
            return false;
        }
        let history = self.entries.entry(id.to_string()).or_default();
        let evicted = history.push(message);
        trace!(
            target: "state.store",
            id,
            len = message.len(),
            depth = history.len(),
            evicted = evicted.is_some(),
            "append"
        );
        true
    }

    /// Lines for `id`, oldest first; empty when absent.
    pub fn get(&self, id: &str) -> Vec<String> {
        self.entries
            .get(id)
            .map(|h| h.iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn history(&self, id: &str) -> Option<&BoundedHistory> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
