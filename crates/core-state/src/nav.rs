use crate::StateError;
use core_model::{LayoutDocument, LayoutSet};
use tracing::{debug, warn};

/// Cyclic state machine over named layouts.
///
/// Invariants:
/// * `order` is non-empty and holds every layout exactly once.
/// * `current < order.len()`, so the current name is always a known layout.
#[derive(Debug, Clone)]
pub struct LayoutNavigator {
    order: Vec<LayoutDocument>,
    current: usize,
}

impl LayoutNavigator {
    /// Start at the first layout in set order.
    pub fn new(layouts: LayoutSet) -> Result<Self, StateError> {
        if layouts.is_empty() {
            return Err(StateError::EmptyLayoutSet);
        }
        let order = layouts.into_documents();
        debug!(
            target: "state.nav",
            layouts = order.len(),
            initial = order[0].name(),
            "navigator_ready"
        );
        Ok(Self { order, current: 0 })
    }

    pub fn current(&self) -> &LayoutDocument {
        &self.order[self.current]
    }

    pub fn current_name(&self) -> &str {
        self.current().name()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(LayoutDocument::name)
    }

    pub fn get(&self, name: &str) -> Option<&LayoutDocument> {
        self.order.iter().find(|d| d.name() == name)
    }

    pub fn layouts(&self) -> impl Iterator<Item = &LayoutDocument> {
        self.order.iter()
    }

    pub fn next(&mut self) -> &str {
        let from = self.current;
        self.current = (self.current + 1) % self.order.len();
        self.log_transition(from, "next");
        self.current_name()
    }

    pub fn prev(&mut self) -> &str {
        let from = self.current;
        let n = self.order.len();
        self.current = (self.current + n - 1) % n;
        self.log_transition(from, "prev");
        self.current_name()
    }

    /// Jump to `target`. Unknown names leave the state untouched.
    pub fn goto(&mut self, target: &str) -> Result<&str, StateError> {
        let Some(index) = self.order.iter().position(|d| d.name() == target) else {
            warn!(target: "state.nav", layout = target, "goto_unknown_layout");
            return Err(StateError::UnknownLayout(target.to_string()));
        };
        let from = self.current;
        self.current = index;
        self.log_transition(from, "goto");
        Ok(self.current_name())
    }

    fn log_transition(&self, from: usize, via: &'static str) {
        debug!(
            target: "state.nav",
            from = self.order[from].name(),
            to = self.current_name(),
            via,
            "layout_transition"
        );
    }
}
