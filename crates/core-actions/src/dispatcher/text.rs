//! Text value store mutation. Both actions need a target id and a
//! message; a missing one makes the action a clean no-op.

use super::DispatchResult;
use core_state::TextValueStore;
use tracing::{debug, trace};

pub(crate) fn handle_update(store: &mut TextValueStore, target: &str, message: &str) -> DispatchResult {
    if store.set(target, message) {
        trace!(target: "actions.dispatch", op = "update_text", id = target, len = message.len(), "text");
        DispatchResult::dirty()
    } else {
        debug!(target: "actions.dispatch", op = "update_text", id = target, "missing_parameter");
        DispatchResult::clean()
    }
}

pub(crate) fn handle_append(store: &mut TextValueStore, target: &str, message: &str) -> DispatchResult {
    if store.append(target, message) {
        trace!(target: "actions.dispatch", op = "append_text", id = target, len = message.len(), "text");
        DispatchResult::dirty()
    } else {
        debug!(target: "actions.dispatch", op = "append_text", id = target, "missing_parameter");
        DispatchResult::clean()
    }
}
